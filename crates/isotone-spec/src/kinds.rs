//! Carrier, modulation and transition kinds.
//!
//! All three are closed enums with a documented default. Parsing never fails:
//! an unrecognized name resolves to the default and logs a warning, so an
//! authoring tool can always load a preset written by a newer or older build.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! lenient_kind {
    (
        $(#[$meta:meta])*
        $name:ident, default = $default:ident, {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal ),+ $(,)?
        }
        aliases { $( $alias:literal => $target:ident ),* $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
        #[serde(from = "String", into = "&'static str")]
        pub enum $name {
            $(
                $(#[$vmeta])*
                $variant,
            )+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Wire name used in preset files.
            pub fn name(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }

            /// Parses a name, returning `None` for anything unrecognized.
            pub fn from_name(name: &str) -> Option<Self> {
                let normalized = name.trim().to_ascii_lowercase();
                match normalized.as_str() {
                    $($wire => Some($name::$variant),)+
                    $($alias => Some($name::$target),)*
                    _ => None,
                }
            }

            /// Parses a name, substituting the default for unknown input.
            pub fn from_name_lenient(name: &str) -> Self {
                match Self::from_name(name) {
                    Some(kind) => kind,
                    None => {
                        let fallback = $name::$default;
                        tracing::warn!(
                            kind = stringify!($name),
                            input = name,
                            fallback = fallback.name(),
                            "unknown kind, using default"
                        );
                        fallback
                    }
                }
            }
        }

        impl From<String> for $name {
            fn from(name: String) -> Self {
                Self::from_name_lenient(&name)
            }
        }

        impl From<$name> for &'static str {
            fn from(kind: $name) -> Self {
                kind.name()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

lenient_kind! {
    /// Carrier waveform of the underlying continuous tone.
    CarrierWaveform, default = Sine, {
        /// Pure sine wave.
        #[default]
        Sine => "sine",
        /// Bipolar square wave.
        Square => "square",
        /// Symmetric triangle wave.
        Triangle => "triangle",
        /// Rising ramp.
        Sawtooth => "sawtooth",
        /// White noise band-passed around the carrier frequency.
        Noise => "noise",
    }
    aliases { "saw" => Sawtooth }
}

lenient_kind! {
    /// Shape of the pulsing gain envelope.
    ModulationShape, default = Square, {
        /// Hard on/off pulses with a duty cycle.
        #[default]
        Square => "square",
        /// Raised sine.
        Sine => "sine",
        /// Ramp up, hold, ramp down.
        Trapezoid => "trapezoid",
        /// Bell pulse centered in each period.
        Gaussian => "gaussian",
    }
    aliases {}
}

lenient_kind! {
    /// Interpolation law for a frequency sweep.
    TransitionKind, default = Linear, {
        /// Straight line between endpoints.
        #[default]
        Linear => "linear",
        /// Geometric (log-spaced) sweep.
        Exponential => "exponential",
        /// Linear in natural-log space.
        Logarithmic => "logarithmic",
        /// Ease-in when rising, ease-out when falling.
        Quadratic => "quadratic",
        /// Logistic curve over [-6, 6].
        Sigmoid => "sigmoid",
    }
    aliases { "none" => Linear }
}

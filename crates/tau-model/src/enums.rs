//! Closed value sets for categorical record fields.
//!
//! Each enum lists the exact spellings accepted in NPX exports. Parsing is an
//! exact, case-sensitive match: values outside the set are rejected, never
//! coerced to the nearest member.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A categorical value outside its field's closed set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{value}' is not an allowed {set} value")]
pub struct UnknownValue {
    pub set: &'static str,
    pub value: String,
}

macro_rules! closed_set {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $variant:ident => $text:tt ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( #[serde(rename = $text)] $variant, )+
        }

        impl $name {
            /// Every accepted spelling, in declaration order.
            pub const VALUES: &'static [&'static str] = &[$($text),+];

            /// Returns the spelling used in NPX exports.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $text, )+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownValue;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $text => Ok($name::$variant), )+
                    _ => Err(UnknownValue {
                        set: stringify!($name),
                        value: s.to_string(),
                    }),
                }
            }
        }
    };
}

closed_set! {
    /// Sample-level QC outcome.
    SampleQc {
        Pass => "Pass",
        Warn => "Warn",
        Fail => "Fail",
    }
}

closed_set! {
    /// Software that produced the NPX export.
    SoftwareName {
        NpxMap => "NPX Map",
        NpxMapCli => "NPX Map CLI",
    }
}

closed_set! {
    /// Software that turned sequencing reads into counts.
    PreProcessingSoftware {
        NpxMapCli => "NPX Map CLI",
        NpxMap => "NPX Map",
        Ngs2Counts => "ngs2counts",
    }
}

closed_set! {
    /// Sequencer the plate was read on.
    InstrumentType {
        ElementAviti => "Element Biosciences AVITI",
        MgiDnbseqT7 => "MGI Tech DNBSEQ T7",
        NextSeq550 => "Illumina NextSeq 550",
        NextSeq1000 => "Illumina NextSeq 1000",
        NextSeq2000 => "Illumina NextSeq 2000",
        NovaSeq6000 => "Illumina NovaSeq 6000",
        NovaSeqX => "Illumina NovaSeq X",
        NovaSeqXPlus => "Illumina NovaSeq X Plus",
        UltimaUg100 => "Ultima Genomics UG100",
    }
}

closed_set! {
    /// Assay variance classification (extended records only).
    HighVarAssay {
        Pass => "Pass",
        HighVariant => "High-variant assay",
    }
}

closed_set! {
    /// Refined sample-level QC against detection and quantification limits.
    SampleLevelQc {
        Pass => "Pass",
        BelowLlod => "Below LLOD",
        BelowLloq => "Below LLOQ",
    }
}

closed_set! {
    /// Assay-level data classification.
    AssayLevelQc {
        Continuous => "Continuous",
        SemiContinuous => "Semi-continuous",
        Categorical => "Categorical",
    }
}

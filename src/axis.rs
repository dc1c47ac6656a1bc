/// Upper bound on array dimensionality.
pub const MAX_DIM: usize = 16;

/// Where a sample's coordinate sits relative to its index.
///
/// Node-centered samples lie at integer offsets, cell-centered samples at
/// half-integer offsets. `Unknown` defers to
/// [`crate::EngineConfig::default_centering`] where a choice is needed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Centering {
    Cell,
    Node,
    Unknown,
}

impl Centering {
    pub const fn label(self) -> &'static str {
        match self {
            Centering::Cell => "cell",
            Centering::Node => "node",
            Centering::Unknown => "unknown",
        }
    }
}

/// Per-axis metadata of an [`crate::NdArray`].
///
/// `spacing` is NaN for non-spatial axes; `min`/`max` are NaN when unset.
#[derive(Clone, Debug)]
pub struct Axis {
    pub size: usize,
    pub spacing: f64,
    pub min: f64,
    pub max: f64,
    pub center: Centering,
    pub label: Option<String>,
    pub units: Option<String>,
}

impl Axis {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            spacing: f64::NAN,
            min: f64::NAN,
            max: f64::NAN,
            center: Centering::Unknown,
            label: None,
            units: None,
        }
    }

    pub fn is_spatial(&self) -> bool {
        self.spacing.is_finite()
    }
}

use thiserror::Error;

use crate::topology::{LengthName, Run};

/// Top-level error for a schematic request.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Structurally invalid input. Never recovered from automatically.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    #[error("unknown shape kind {0:?}")]
    UnknownShape(String),

    #[error("unknown cushion policy {0:?}")]
    UnknownCushionPolicy(String),

    #[error("unknown side {0:?}")]
    UnknownSide(String),

    #[error("{shape} requires length {length}")]
    MissingLength {
        shape: &'static str,
        length: LengthName,
    },

    #[error("{shape} has no return for length {length}")]
    UnexpectedLength {
        shape: &'static str,
        length: LengthName,
    },

    #[error("{name} must be a positive number of centimeters, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    #[error("{name} of {value} cm exceeds the {max} cm limit")]
    TooLong {
        name: &'static str,
        value: f64,
        max: f64,
    },

    #[error("a meridienne on the {side} side is not available for {shape}")]
    MeridienneSide { side: String, shape: &'static str },

    #[error("invalid color {value:?} for role {role}")]
    InvalidColor { role: String, value: String },
}

/// Structurally valid input that cannot be tiled or placed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("depth {depth} cm leaves no seat behind a {backrest} cm backrest")]
    DepthTooShallow { depth: f64, backrest: f64 },

    #[error("{length} cm is shorter than the {needed} cm taken by the corner footprint")]
    CornerFootprint { length: f64, needed: f64 },

    #[error(
        "end allowances of {allowances} cm exceed the raw length {raw} cm (usable {usable} cm)"
    )]
    NegativeUsable {
        raw: f64,
        allowances: f64,
        usable: f64,
    },

    #[error("meridienne of {length} cm exceeds the {available} cm available")]
    MeridienneTooLong { length: f64, available: f64 },

    #[error("usable length {usable} cm is shorter than the {minimum} cm minimum module")]
    BelowMinimumModule { usable: f64, minimum: f64 },

    #[error("usable length {usable} cm exceeds the {max} cm limit")]
    RunTooLong { usable: f64, max: f64 },

    #[error("{run} run: {source}")]
    InRun {
        run: Run,
        #[source]
        source: Box<LayoutError>,
    },
}

impl LayoutError {
    /// Attaches the identity of the run being laid out.
    pub fn in_run(self, run: Run) -> Self {
        match self {
            already @ LayoutError::InRun { .. } => already,
            other => LayoutError::InRun {
                run,
                source: Box::new(other),
            },
        }
    }

    /// Strips any run context and returns the underlying failure.
    pub fn root(&self) -> &LayoutError {
        match self {
            LayoutError::InRun { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Failure while drawing a scene whose geometry was already valid.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("pixels per centimeter must be positive, got {0}")]
    InvalidScale(f64),

    #[error("failed to load font {path}: {source}")]
    Font {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("SVG parse error: {0}")]
    Svg(String),

    #[error("cannot allocate a {width}x{height} drawing surface")]
    Surface { width: u32, height: u32 },

    #[error("PNG encoding failed: {0}")]
    Png(#[from] png::EncodingError),
}

/// Convenience alias for results using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

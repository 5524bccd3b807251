/// Options describing how a grayscale image becomes a set of traced pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaskOptions {
    /// Pixels with a luma above this value are background.
    pub threshold: u8,
    /// Trace the light pixels instead of the dark ones.
    pub invert: bool,
}

impl Default for MaskOptions {
    fn default() -> Self {
        Self {
            threshold: 127,
            invert: false,
        }
    }
}

impl MaskOptions {
    pub fn with_threshold(mut self, threshold: u8) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_invert(mut self, invert: bool) -> Self {
        self.invert = invert;
        self
    }
}

/// How potrace resolves ambiguous turns while decomposing the bitmap into paths.
///
/// Discriminants are potrace's `POTRACE_TURNPOLICY_*` codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(i32)]
pub enum TurnPolicy {
    Black = 0,
    White = 1,
    Left = 2,
    Right = 3,
    #[default]
    Minority = 4,
    Majority = 5,
    Random = 6,
}

/// Parameters forwarded to `potrace_trace`.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceParams {
    /// Suppress speckles up to this many pixels.
    pub turdsize: i32,
    pub turn_policy: TurnPolicy,
    /// Corner threshold; larger values give smoother curves.
    pub alphamax: f64,
    /// Join adjacent Bezier segments when possible.
    pub opticurve: bool,
    /// Tolerance used when joining segments.
    pub opttolerance: f64,
}

impl Default for TraceParams {
    fn default() -> Self {
        Self {
            turdsize: 2,
            turn_policy: TurnPolicy::default(),
            alphamax: 1.0,
            opticurve: true,
            opttolerance: 0.2,
        }
    }
}

impl TraceParams {
    pub fn with_turdsize(mut self, turdsize: i32) -> Self {
        self.turdsize = turdsize;
        self
    }

    pub fn with_turn_policy(mut self, turn_policy: TurnPolicy) -> Self {
        self.turn_policy = turn_policy;
        self
    }

    pub fn with_alphamax(mut self, alphamax: f64) -> Self {
        self.alphamax = alphamax;
        self
    }

    pub fn with_opticurve(mut self, opticurve: bool) -> Self {
        self.opticurve = opticurve;
        self
    }

    pub fn with_opttolerance(mut self, opttolerance: f64) -> Self {
        self.opttolerance = opttolerance;
        self
    }
}

//! Safe wrapper around libpotrace's tracing entry points.

pub mod sys;

use std::ffi::CStr;
use std::marker::PhantomData;
use std::os::raw::c_int;
use std::ptr::NonNull;
use std::slice;

use log::debug;

use crate::bitmap::{PackedBitmap, RawBitmap};
use crate::config::TraceParams;
use crate::{BitmapError, BitmapResult};

use self::sys::{
    potrace_bitmap_t, potrace_dpoint_t, potrace_param_t, potrace_path_t, potrace_state_t,
};

/// A point in bitmap coordinates.
pub type Point = (f64, f64);

/// Version string reported by the linked libpotrace.
pub fn version() -> String {
    // SAFETY: potrace_version returns a static NUL-terminated string.
    unsafe { CStr::from_ptr(sys::potrace_version()) }
        .to_string_lossy()
        .into_owned()
}

/// One segment of a closed potrace curve. The start point is the end point
/// of the previous segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    /// Two straight lines through the corner `c1` ending at `c2`.
    Corner { c1: Point, c2: Point },
    /// A cubic Bezier with control points `c0`, `c1` ending at `c2`.
    CurveTo { c0: Point, c1: Point, c2: Point },
}

impl Segment {
    fn from_raw(tag: c_int, c: &[potrace_dpoint_t; 3]) -> Option<Self> {
        let point = |p: &potrace_dpoint_t| (p.x, p.y);
        match tag {
            sys::POTRACE_CORNER => Some(Segment::Corner {
                c1: point(&c[1]),
                c2: point(&c[2]),
            }),
            sys::POTRACE_CURVETO => Some(Segment::CurveTo {
                c0: point(&c[0]),
                c1: point(&c[1]),
                c2: point(&c[2]),
            }),
            _ => None,
        }
    }

    pub fn end_point(&self) -> Point {
        match self {
            Segment::Corner { c2, .. } | Segment::CurveTo { c2, .. } => *c2,
        }
    }
}

/// Whether a path outlines filled pixels or a hole inside them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathSign {
    Positive,
    Negative,
}

/// A closed path produced by potrace, copied out of the trace state.
#[derive(Debug, Clone, PartialEq)]
pub struct TracedPath {
    pub area: i32,
    pub sign: PathSign,
    pub segments: Vec<Segment>,
}

impl TracedPath {
    fn from_raw(path: &potrace_path_t) -> Self {
        let n = usize::try_from(path.curve.n).unwrap_or(0);
        let segments = if n == 0 || path.curve.tag.is_null() || path.curve.c.is_null() {
            Vec::new()
        } else {
            // SAFETY: potrace allocates `n` tags and `n` point triples per curve.
            let (tags, points) = unsafe {
                (
                    slice::from_raw_parts(path.curve.tag, n),
                    slice::from_raw_parts(path.curve.c, n),
                )
            };
            tags.iter()
                .zip(points)
                .filter_map(|(tag, c)| Segment::from_raw(*tag, c))
                .collect()
        };

        Self {
            area: path.area,
            sign: if path.sign == c_int::from(b'-') {
                PathSign::Negative
            } else {
                PathSign::Positive
            },
            segments,
        }
    }

    /// Where the closed curve starts, which is where its last segment ends.
    pub fn start_point(&self) -> Option<Point> {
        self.segments.last().map(Segment::end_point)
    }

    pub fn is_hole(&self) -> bool {
        self.sign == PathSign::Negative
    }

    /// Flatten the path into a closed polyline.
    ///
    /// Corners contribute their two points as-is. Bezier segments are sampled
    /// so the polyline never strays further than `resolution` from the true
    /// curve. A non-positive `resolution` keeps only the segment end points.
    /// The first point is the start point, so the last point repeats it.
    pub fn to_points(&self, resolution: f64) -> Vec<Point> {
        let Some(mut last) = self.start_point() else {
            return Vec::new();
        };
        let mut points = vec![last];
        for segment in &self.segments {
            match *segment {
                Segment::Corner { c1, c2 } => points.extend([c1, c2]),
                Segment::CurveTo { c0, c1, c2 } => {
                    flatten_bezier(&mut points, [last, c0, c1, c2], resolution)
                }
            }
            last = segment.end_point();
        }
        points
    }
}

/// Sample a cubic Bezier at a fixed parameter interval chosen from the
/// maximum of its second derivative, which is reached at an end point.
fn flatten_bezier(points: &mut Vec<Point>, [p0, p1, p2, p3]: [Point; 4], resolution: f64) {
    let second_diff = |a: Point, b: Point, c: Point| {
        (a.0 - 2.0 * b.0 + c.0).powi(2) + (a.1 - 2.0 * b.1 + c.1).powi(2)
    };
    let dd = 6.0 * second_diff(p0, p1, p2).max(second_diff(p1, p2, p3)).sqrt();
    let e2 = if 8.0 * resolution <= dd {
        8.0 * resolution / dd
    } else {
        1.0
    };
    let interval = e2.sqrt();
    let interval = if interval > 0.0 { interval } else { 1.0 };

    let mut i = 0u32;
    loop {
        let t = f64::from(i) * interval;
        if t >= 1.0 {
            break;
        }
        let u = 1.0 - t;
        let (b0, b1, b2, b3) = (u * u * u, 3.0 * u * u * t, 3.0 * u * t * t, t * t * t);
        points.push((
            b0 * p0.0 + b1 * p1.0 + b2 * p2.0 + b3 * p3.0,
            b0 * p0.1 + b1 * p1.1 + b2 * p2.1 + b3 * p3.1,
        ));
        i += 1;
    }
    points.push(p3);
}

/// Owns a `potrace_param_t` for the duration of a trace call.
struct Params(NonNull<potrace_param_t>);

impl Params {
    fn new(params: &TraceParams) -> BitmapResult<Self> {
        // SAFETY: plain allocation, checked for null below.
        let raw = unsafe { sys::potrace_param_default() };
        let mut raw = NonNull::new(raw)
            .ok_or_else(|| BitmapError::Trace("potrace_param_default returned null".into()))?;
        // SAFETY: `raw` is a valid, exclusively owned parameter block.
        let p = unsafe { raw.as_mut() };
        p.turdsize = params.turdsize;
        p.turnpolicy = params.turn_policy as c_int;
        p.alphamax = params.alphamax;
        p.opticurve = c_int::from(params.opticurve);
        p.opttolerance = params.opttolerance;
        Ok(Self(raw))
    }
}

impl Drop for Params {
    fn drop(&mut self) {
        // SAFETY: allocated by potrace_param_default and freed exactly once.
        unsafe { sys::potrace_param_free(self.0.as_ptr()) }
    }
}

/// The result of a successful trace. The underlying potrace state is freed on drop.
pub struct TraceResult {
    state: NonNull<potrace_state_t>,
}

impl TraceResult {
    /// Number of paths, counted without copying any curve data.
    pub fn path_count(&self) -> usize {
        // SAFETY: the state and its path list stay alive as long as `self`.
        let mut next = unsafe { self.state.as_ref().plist };
        let mut count = 0;
        while let Some(path) = unsafe { next.as_ref() } {
            count += 1;
            next = path.next;
        }
        count
    }

    /// Iterate over every path in potrace's flat path list.
    pub fn paths(&self) -> Paths<'_> {
        // SAFETY: the state stays alive as long as `self`.
        let plist = unsafe { self.state.as_ref().plist };
        Paths {
            next: plist,
            _state: PhantomData,
        }
    }
}

impl Drop for TraceResult {
    fn drop(&mut self) {
        // SAFETY: allocated by potrace_trace and freed exactly once.
        unsafe { sys::potrace_state_free(self.state.as_ptr()) }
    }
}

impl std::fmt::Debug for TraceResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TraceResult")
            .field("paths", &self.path_count())
            .finish()
    }
}

/// Iterator over the paths of a [`TraceResult`].
pub struct Paths<'a> {
    next: *const potrace_path_t,
    _state: PhantomData<&'a TraceResult>,
}

impl Iterator for Paths<'_> {
    type Item = TracedPath;

    fn next(&mut self) -> Option<Self::Item> {
        // SAFETY: list nodes are owned by the borrowed state.
        let path = unsafe { self.next.as_ref() }?;
        self.next = path.next;
        Some(TracedPath::from_raw(path))
    }
}

/// Trace a packed bitmap with potrace.
pub fn trace(bitmap: &PackedBitmap, params: &TraceParams) -> BitmapResult<TraceResult> {
    let descriptor = bitmap.as_raw()?;
    let param = Params::new(params)?;

    // RawBitmap mirrors the generated potrace_bitmap_t field for field.
    let bm = (&descriptor as *const RawBitmap<'_>).cast::<potrace_bitmap_t>();
    // SAFETY: both pointers are valid for the duration of the call and potrace
    // only reads the bitmap buffer.
    let state = unsafe { sys::potrace_trace(param.0.as_ptr(), bm) };
    let state = NonNull::new(state)
        .ok_or_else(|| BitmapError::Trace("potrace_trace returned null".into()))?;
    let result = TraceResult { state };

    // SAFETY: state is non-null and owned by `result`.
    check_status(unsafe { result.state.as_ref().status })?;

    debug!(
        "Traced {}x{} bitmap into {} paths",
        bitmap.width(),
        bitmap.height(),
        result.path_count()
    );
    Ok(result)
}

fn check_status(status: c_int) -> BitmapResult<()> {
    match status {
        sys::POTRACE_STATUS_OK => Ok(()),
        sys::POTRACE_STATUS_INCOMPLETE => Err(BitmapError::Trace(
            "potrace stopped before finishing the trace".into(),
        )),
        other => Err(BitmapError::Trace(format!(
            "potrace finished with unknown status {other}"
        ))),
    }
}

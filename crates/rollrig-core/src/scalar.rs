/// Engine-wide scalar. f32 everywhere; quantize at telemetry/hash edges
/// rather than mixing precisions mid-pipeline.
pub type Scalar = f32;

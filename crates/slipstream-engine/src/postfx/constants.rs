//! Draw-time shader constant supply.

/// Name of the boost intensity constant in the effect program.
pub const BOOST_AMOUNT: &str = "boost_amount";

/// Name of the sampler-slot constant in the effect program.
pub const COLOR_BUFFER: &str = "color_buffer";

/// Constants declared by the effect program, in layout order.
pub const EFFECT_CONSTANTS: [&str; 2] = [BOOST_AMOUNT, COLOR_BUFFER];

/// Backend-side writer for named program constants.
pub trait ShaderConstantSink {
    fn set_pixel_f32(&mut self, name: &str, values: &[f32]);
    fn set_pixel_i32(&mut self, name: &str, values: &[i32]);
}

/// Implemented by whoever owns the values a program reads.
///
/// The backend calls this right before the pixel stage of a draw runs, so
/// implementors must read live state rather than a cached snapshot.
pub trait ShaderConstantCallback {
    fn supply_shader_constants(&self, sink: &mut dyn ShaderConstantSink);
}

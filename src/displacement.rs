use crate::trail_buffer::TrailBuffer;

/// Destination for a full RGBA8 raster upload.
///
/// The renderer's [`crate::TextureManager`] writes into the displacement texture; tests can count
/// uploads without a GPU.
pub trait RasterSink {
    type Error;

    fn write_raster(&self, dimensions: (u32, u32), rgba: &[u8]) -> Result<(), Self::Error>;
}

/// Keeps the GPU copy of the trail buffer in step with the CPU raster.
///
/// The raster is only read here, after the frame's trail update has finished, so the shader
/// never samples a half-updated buffer.
#[derive(Debug, Default)]
pub struct DisplacementTexture {
    uploads: u64,
}

impl DisplacementTexture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uploads `trail` if it changed since the last sync. Returns whether an upload happened.
    ///
    /// The buffer stays dirty when the upload fails so the next frame retries.
    pub fn sync<S: RasterSink>(
        &mut self,
        trail: &mut TrailBuffer,
        sink: &S,
    ) -> Result<bool, S::Error> {
        if !trail.is_dirty() {
            return Ok(false);
        }

        sink.write_raster(trail.dimensions(), trail.as_bytes())?;
        trail.mark_clean();
        self.uploads += 1;
        Ok(true)
    }

    /// Number of uploads performed so far.
    pub fn uploads(&self) -> u64 {
        self.uploads
    }
}

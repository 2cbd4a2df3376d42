use super::*;

fn copy_padded_readback_rows(
    data: &[u8],
    height: u32,
    unpadded_bytes_per_row: u32,
    padded_bytes_per_row: u32,
    output: &mut Vec<u8>,
) {
    let output_size = (unpadded_bytes_per_row * height) as usize;
    output.resize(output_size, 0);

    if padded_bytes_per_row == unpadded_bytes_per_row {
        output.copy_from_slice(&data[..output_size]);
        return;
    }

    for (row, chunk) in output
        .chunks_exact_mut(unpadded_bytes_per_row as usize)
        .enumerate()
    {
        let padded_offset = row * padded_bytes_per_row as usize;
        chunk.copy_from_slice(&data[padded_offset..padded_offset + chunk.len()]);
    }
}

impl<'a> Renderer<'a> {
    fn map_readback_buffer_into(
        device: &wgpu::Device,
        buffer: &wgpu::Buffer,
        mapped_bytes: &mut Vec<u8>,
    ) {
        mapped_bytes.clear();

        let buffer_slice = buffer.slice(..);
        let (sender, receiver) = std::sync::mpsc::channel();
        buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
            if sender.send(result).is_err() {
                warn!("Failed to send map_async result from callback");
            }
        });

        if let Err(error) = device.poll(wgpu::PollType::Wait) {
            warn!("Failed to wait for the readback copy: {error}");
        }

        let map_result = match receiver.recv() {
            Ok(result) => result,
            Err(error) => {
                warn!("Failed to receive mapped buffer result: {}", error);
                return;
            }
        };

        if let Err(error) = map_result {
            warn!("Failed to map readback buffer: {:?}", error);
            return;
        }

        let mapped_range = buffer_slice.get_mapped_range();
        mapped_bytes.extend_from_slice(&mapped_range);
        drop(mapped_range);
        buffer.unmap();
    }

    /// Renders one frame offscreen and copies it into `buffer` as tightly packed BGRA8 rows.
    ///
    /// `buffer` is left untouched if the readback fails; the failure is logged.
    pub fn render_to_buffer(&mut self, buffer: &mut Vec<u8>) -> FrameReport {
        let mut report = self.prepare_frame();

        let (width, height) = (self.config.width, self.config.height);

        let offscreen_texture = match self.offscreen_texture.take() {
            Some(texture) => texture,
            None => create_offscreen_color_texture(&self.device, (width, height), self.config.format),
        };
        let texture_view = offscreen_texture.create_view(&wgpu::TextureViewDescriptor::default());
        self.render_to_texture_view(&texture_view, &mut report);

        let (unpadded_bytes_per_row, padded_bytes_per_row) = compute_padded_bytes_per_row(width, 4);
        let buffer_size = padded_bytes_per_row as u64 * height as u64;

        let output_buffer = match self.readback_buffer.take() {
            Some(existing) if existing.size() >= buffer_size => existing,
            _ => create_readback_buffer(&self.device, Some("readback_buffer"), buffer_size),
        };

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("copy_texture_encoder"),
            });
        encode_copy_texture_to_buffer(
            &mut encoder,
            &offscreen_texture,
            &output_buffer,
            width,
            height,
            padded_bytes_per_row,
        );
        self.queue.submit(std::iter::once(encoder.finish()));

        let mut readback_bytes = std::mem::take(&mut self.readback_bytes);
        Self::map_readback_buffer_into(&self.device, &output_buffer, &mut readback_bytes);

        let required_readback_len = (height as usize).saturating_mul(padded_bytes_per_row as usize);
        if readback_bytes.len() < required_readback_len {
            warn!(
                "render_to_buffer: readback too short: {} < {}",
                readback_bytes.len(),
                required_readback_len
            );
        } else {
            copy_padded_readback_rows(
                &readback_bytes,
                height,
                unpadded_bytes_per_row,
                padded_bytes_per_row,
                buffer,
            );
        }

        self.readback_bytes = readback_bytes;
        self.offscreen_texture = Some(offscreen_texture);
        self.readback_buffer = Some(output_buffer);
        report
    }
}

//! Device selection: CUDA when available, CPU fallback.

use candle_core::Device;

/// Select the compute device for the run.
///
/// Tries CUDA first (when compiled with the `cuda` feature), then Metal
/// (`metal` feature), then falls back to CPU. Chosen once at startup and
/// fixed for the whole run.
pub fn select_device() -> Device {
    #[cfg(feature = "cuda")]
    {
        if let Ok(device) = Device::new_cuda(0) {
            tracing::info!("using CUDA device 0");
            return device;
        }
        tracing::warn!("cuda feature enabled but no GPU available, falling back");
    }

    #[cfg(feature = "metal")]
    {
        if let Ok(device) = Device::new_metal(0) {
            tracing::info!("using Metal device 0");
            return device;
        }
        tracing::warn!("metal feature enabled but no device available, falling back");
    }

    Device::Cpu
}

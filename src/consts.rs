/// Token-denominated rates are quoted per million units
pub(crate) const PER_MILLION: f64 = 1_000_000.0;

/// Duration assumed for a generated video whose length the provider did not report
pub(crate) const DEFAULT_VIDEO_SECONDS: u64 = 5;

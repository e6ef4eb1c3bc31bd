use palette::Srgba;

// ---------------------------------------------------------------------------
// Legend buckets: % of threshold → colour
// ---------------------------------------------------------------------------

/// Lower bounds of the five legend buckets, in % of threshold.
pub const LEGEND_SPLITS: [f64; 5] = [0.0, 50.0, 100.0, 500.0, 1000.0];

/// Towns whose reading has no threshold percentage.
pub fn na_color() -> Srgba<u8> {
    Srgba::new(0xcc, 0xcc, 0xcc, 0xff)
}

/// Bucket colours, lowest bucket first.
pub fn legend_colors() -> [Srgba<u8>; 5] {
    [
        Srgba::new(0x5b, 0xb6, 0xa9, 0xff),
        Srgba::new(0xce, 0xeb, 0x9c, 0xff),
        Srgba::new(0xfd, 0xcc, 0x7a, 0xff),
        Srgba::new(0xed, 0x63, 0x45, 0xff),
        Srgba::new(0x9e, 0x01, 0x42, 0xff),
    ]
}

/// Index of the legend bucket for `pct`.
///
/// The first upper bound the value stays below decides the bucket; anything
/// at or above the last split lands in the top bucket.
pub fn bucket(pct: f64) -> usize {
    LEGEND_SPLITS[1..]
        .iter()
        .position(|&upper| pct < upper)
        .unwrap_or(LEGEND_SPLITS.len() - 1)
}

/// Fill colour for a town reading.
pub fn classify(pct: Option<f64>) -> Srgba<u8> {
    match pct {
        Some(p) => legend_colors()[bucket(p)],
        None => na_color(),
    }
}

/// Labels in legend order: `"[0 - 50%)"`, ..., `"1000% +"`.
pub fn legend_labels() -> Vec<String> {
    let mut labels: Vec<String> = LEGEND_SPLITS
        .windows(2)
        .map(|w| format!("[{} - {}%)", w[0], w[1]))
        .collect();
    labels.push(format!("{}% +", LEGEND_SPLITS[LEGEND_SPLITS.len() - 1]));
    labels
}

/// The legend entries (colour, label) for the UI.
pub fn legend_entries() -> Vec<(Srgba<u8>, String)> {
    legend_colors().into_iter().zip(legend_labels()).collect()
}

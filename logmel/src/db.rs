//! Power to decibel compression.
//!
//! The reference level and the clip floor are both taken over the whole
//! matrix, so compression runs only after every frame's mel energies exist.

/// Converts mel energies to dB relative to their maximum.
///
/// Each value becomes `10*log10(max(p, amin)) - 10*log10(max(ref, amin))`
/// with `ref = max(energies)`, so the loudest entry maps to 0 dB and an
/// all-zero input maps to all zeros. With `top_db` set, values more than
/// `top_db` below the output maximum are raised to that floor.
pub fn power_to_db(energies: &[f64], amin: f64, top_db: Option<f64>) -> Vec<f32> {
    let reference = energies.iter().cloned().fold(0.0f64, f64::max);
    let ref_db = 10.0 * reference.max(amin).log10();

    let mut db: Vec<f64> = energies
        .iter()
        .map(|&p| 10.0 * p.max(amin).log10() - ref_db)
        .collect();

    if let Some(top_db) = top_db {
        let peak = db.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let floor = peak - top_db;
        for v in &mut db {
            if *v < floor {
                *v = floor;
            }
        }
    }

    db.into_iter().map(|v| v as f32).collect()
}

use sortscope_core::TraceRecorder;

/// Bubble sort without early exit. Each pass ends with a `sorted` marker
/// on the position it finalized.
pub fn bubble_sort(rec: &mut TraceRecorder) {
    let n = rec.array_len();
    for i in 0..n.saturating_sub(1) {
        for j in 0..n - i - 1 {
            if let Some((a, b)) = rec.compare(j, j + 1) {
                if a > b {
                    rec.swap(j, j + 1);
                }
            }
        }
        rec.sorted(&[n - 1 - i]);
    }
}

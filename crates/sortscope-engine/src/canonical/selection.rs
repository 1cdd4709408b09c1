use sortscope_core::{HighlightColor, TraceRecorder};

/// Selection sort. Each pass highlights the slot being filled as the
/// minimum candidate, scans the rest, swaps if a smaller element was found,
/// then marks the slot sorted.
pub fn selection_sort(rec: &mut TraceRecorder) {
    let n = rec.array_len();
    for i in 0..n.saturating_sub(1) {
        rec.highlight(&[i], HighlightColor::Candidate);
        let mut min = i;
        for j in i + 1..n {
            if let Some((current, candidate)) = rec.compare(min, j) {
                if candidate < current {
                    min = j;
                }
            }
        }
        if min != i {
            rec.swap(i, min);
        }
        rec.sorted(&[i]);
    }
}

use sortscope_core::{HighlightColor, TraceRecorder};

/// Insertion sort by adjacent swaps. The key is highlighted before it is
/// shifted left, and its final resting index is marked sorted.
pub fn insertion_sort(rec: &mut TraceRecorder) {
    let n = rec.array_len();
    for i in 1..n {
        rec.highlight(&[i], HighlightColor::Key);
        let mut j = i;
        while j > 0 {
            match rec.compare(j - 1, j) {
                Some((left, key)) if left > key => {
                    rec.swap(j - 1, j);
                    j -= 1;
                }
                _ => break,
            }
        }
        rec.sorted(&[j]);
    }
}

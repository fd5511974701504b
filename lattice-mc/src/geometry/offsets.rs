/// Moore neighbor offsets: the forward half of the `3^n_dims - 1` box
/// displacements around a site.
///
/// An offset is forward when its first nonzero component is positive; the
/// backward neighbor is its negation. For `n_dims = 2` this returns
/// `[[0,1], [1,-1], [1,0], [1,1]]`, giving coordination number 8.
pub fn moore(n_dims: usize) -> Vec<Vec<isize>> {
    let n_box = 3usize.pow(n_dims as u32);
    let mut offsets = Vec::with_capacity(n_box / 2);
    for code in 0..n_box {
        let mut rem = code;
        let mut off = vec![0isize; n_dims];
        for c in off.iter_mut().rev() {
            *c = (rem % 3) as isize - 1;
            rem /= 3;
        }
        if off.iter().find(|&&c| c != 0).is_some_and(|&c| c > 0) {
            offsets.push(off);
        }
    }
    offsets
}

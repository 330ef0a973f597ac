use super::{DatasetBase, Records};
use ndarray::{ArrayBase, Data, Ix2};

/// Implement records for NdArrays
impl<S: Data> Records for ArrayBase<S, Ix2> {
    type Elem = S::Elem;

    fn nsamples(&self) -> usize {
        self.nrows()
    }

    fn nfeatures(&self) -> usize {
        self.ncols()
    }
}

/// Implement records for a DatasetBase
impl<R: Records, T> Records for DatasetBase<R, T> {
    type Elem = R::Elem;

    fn nsamples(&self) -> usize {
        self.records.nsamples()
    }

    fn nfeatures(&self) -> usize {
        self.records.nfeatures()
    }
}

/// Implement records for references
impl<R: Records> Records for &R {
    type Elem = R::Elem;

    fn nsamples(&self) -> usize {
        (*self).nsamples()
    }

    fn nfeatures(&self) -> usize {
        (*self).nfeatures()
    }
}

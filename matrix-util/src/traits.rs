use crate::common_io::Delimiter;
use rand::Rng;

/// Operations to sample random arrays from a caller-owned random
/// number generator, so that a fixed seed reproduces the draws.
pub trait SampleOps {
    type Mat;
    type Scalar;
    type Shape;

    /// Sample an array from a normal distribution `N(0,1)`
    ///
    /// Draws are consumed in the logical (row-major) order of `shape`.
    fn rnorm_using<R>(shape: Self::Shape, rng: &mut R) -> Self::Mat
    where
        R: Rng + ?Sized;
}

/// Operations on a stack of per-output lower-triangular factors
/// stored as an `[N, N, M]` array, one `N x N` block for each of the
/// `M` outputs.
pub trait CholeskyBlockOps {
    type Scalar;
    type Mat;
    type Tensor;

    /// Number of rows `N` and number of blocks `M`
    fn block_dims(&self) -> anyhow::Result<(usize, usize)>;

    /// Diagonal of `L[:,:,m] L[:,:,m]^T` for every block, shape `[N, M]`
    fn block_diag_llt(&self) -> Self::Mat;

    /// Multiply each block with a batch of vectors.
    ///
    /// * `z` - shape `[S, M, N]`
    ///
    /// Returns `out[s, :, m] = L[:,:,m] z[s, m, :]` with shape `[S, N, M]`
    fn block_matvec(&self, z: &Self::Tensor) -> anyhow::Result<Self::Tensor>;

    /// Stack the `M` blocks vertically into an `[N * M, N]` matrix
    fn to_stacked_blocks(&self) -> Self::Mat;

    /// Inverse of `to_stacked_blocks`
    fn from_stacked_blocks(stacked: &Self::Mat, num_blocks: usize)
        -> anyhow::Result<Self::Tensor>;
}

/// Read and write matrices from and to files
pub trait IoOps {
    type Scalar;
    type Mat;

    fn read_file_delim(
        file: &str,
        delim: impl Into<Delimiter>,
        skip: Option<usize>,
    ) -> anyhow::Result<Self::Mat>;

    fn from_tsv(tsv_file: &str, skip: Option<usize>) -> anyhow::Result<Self::Mat> {
        Self::read_file_delim(tsv_file, "\t", skip)
    }

    fn write_file_delim(&self, file: &str, delim: &str) -> anyhow::Result<()>;

    fn to_tsv(&self, tsv_file: &str) -> anyhow::Result<()> {
        self.write_file_delim(tsv_file, "\t")
    }
}

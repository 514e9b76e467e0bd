pub use ndarray::prelude::*;
pub use rand::Rng;
pub use rand_distr::StandardNormal;
pub use rayon::prelude::*;

use crate::traits::*;
use num_traits::{Float, FromPrimitive};

impl<T, D> SampleOps for Array<T, D>
where
    T: Float + FromPrimitive,
    D: Dimension,
{
    type Mat = Self;
    type Scalar = T;
    type Shape = D;

    fn rnorm_using<R>(shape: D, rng: &mut R) -> Self::Mat
    where
        R: Rng + ?Sized,
    {
        Array::from_shape_simple_fn(shape, || {
            let x: f64 = rng.sample(StandardNormal);
            T::from_f64(x).unwrap_or_else(T::nan)
        })
    }
}

impl CholeskyBlockOps for Array3<f64> {
    type Scalar = f64;
    type Mat = Array2<f64>;
    type Tensor = Array3<f64>;

    fn block_dims(&self) -> anyhow::Result<(usize, usize)> {
        let (nn, nn2, mm) = self.dim();
        if nn != nn2 {
            anyhow::bail!("blocks are not square: [{}, {}, {}]", nn, nn2, mm);
        }
        Ok((nn, mm))
    }

    fn block_diag_llt(&self) -> Self::Mat {
        // (L L^T)[n, n] = sum_k L[n, k]^2
        self.mapv(|x| x * x).sum_axis(Axis(1))
    }

    fn block_matvec(&self, z: &Self::Tensor) -> anyhow::Result<Self::Tensor> {
        let (nn, mm) = self.block_dims()?;
        let (ss, z_m, z_n) = z.dim();

        if z_m != mm || z_n != nn {
            anyhow::bail!(
                "innovations [{}, {}, {}] do not match blocks [{}, {}, {}]",
                ss,
                z_m,
                z_n,
                nn,
                nn,
                mm
            );
        }

        let mut out = Array3::<f64>::zeros((ss, nn, mm));

        out.axis_iter_mut(Axis(0))
            .into_par_iter()
            .zip(z.axis_iter(Axis(0)).into_par_iter())
            .for_each(|(mut out_s, z_s)| {
                for m in 0..mm {
                    let l_m = self.index_axis(Axis(2), m);
                    out_s.column_mut(m).assign(&l_m.dot(&z_s.row(m)));
                }
            });

        Ok(out)
    }

    fn to_stacked_blocks(&self) -> Self::Mat {
        let (nn, nn2, mm) = self.dim();
        let mut ret = Array2::<f64>::zeros((nn * mm, nn2));
        for m in 0..mm {
            ret.slice_mut(s![(m * nn)..((m + 1) * nn), ..])
                .assign(&self.index_axis(Axis(2), m));
        }
        ret
    }

    fn from_stacked_blocks(
        stacked: &Self::Mat,
        num_blocks: usize,
    ) -> anyhow::Result<Self::Tensor> {
        let (nrows, nn) = stacked.dim();

        if num_blocks == 0 || nrows != nn * num_blocks {
            anyhow::bail!(
                "cannot split a [{}, {}] matrix into {} square blocks",
                nrows,
                nn,
                num_blocks
            );
        }

        let mut ret = Array3::<f64>::zeros((nn, nn, num_blocks));
        for m in 0..num_blocks {
            ret.index_axis_mut(Axis(2), m)
                .assign(&stacked.slice(s![(m * nn)..((m + 1) * nn), ..]));
        }
        Ok(ret)
    }
}

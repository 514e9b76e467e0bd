use matrix_util::common_io::{create_temp_dir_file, write_lines};
use matrix_util::traits::{CholeskyBlockOps, IoOps, SampleOps};
use ndarray::{Array2, Array3, Ix2, Ix3};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn ndarray_io_test() -> anyhow::Result<()> {
    let mut rng = StdRng::seed_from_u64(42);
    let xx = Array2::<f64>::rnorm_using(Ix2(50, 7), &mut rng);

    let tsv_file = create_temp_dir_file("tsv.gz")?;
    let tsv_file = tsv_file.to_str().ok_or(anyhow::anyhow!("bad path"))?;
    xx.to_tsv(tsv_file)?;

    let yy = Array2::<f64>::read_file_delim(tsv_file, "\t", None)?;

    approx::assert_abs_diff_eq!(xx, yy, epsilon = 1e-12);

    Ok(())
}

#[test]
fn ndarray_io_skips_header_and_comments() -> anyhow::Result<()> {
    let tsv_file = create_temp_dir_file("tsv")?;
    let tsv_file = tsv_file.to_str().ok_or(anyhow::anyhow!("bad path"))?;

    let lines = vec!["# comment", "a\tb", "1\t2", "", "3\t4"];
    write_lines(&lines, tsv_file)?;

    let yy = Array2::<f64>::read_file_delim(tsv_file, "\t", Some(0))?;
    assert_eq!(yy, ndarray::array![[1., 2.], [3., 4.]]);

    Ok(())
}

#[test]
fn ragged_file_is_an_error() -> anyhow::Result<()> {
    let tsv_file = create_temp_dir_file("tsv")?;
    let tsv_file = tsv_file.to_str().ok_or(anyhow::anyhow!("bad path"))?;

    write_lines(&["1\t2", "3"], tsv_file)?;
    assert!(Array2::<f64>::from_tsv(tsv_file, None).is_err());

    Ok(())
}

#[test]
fn cholesky_blocks_io_test() -> anyhow::Result<()> {
    let mut rng = StdRng::seed_from_u64(3);
    let ll = Array3::<f64>::rnorm_using(Ix3(4, 4, 3), &mut rng);

    let tsv_file = create_temp_dir_file("tsv")?;
    let tsv_file = tsv_file.to_str().ok_or(anyhow::anyhow!("bad path"))?;
    ll.to_stacked_blocks().to_tsv(tsv_file)?;

    let stacked = Array2::<f64>::from_tsv(tsv_file, None)?;
    let back = Array3::<f64>::from_stacked_blocks(&stacked, 3)?;

    approx::assert_abs_diff_eq!(ll, back, epsilon = 1e-12);

    Ok(())
}

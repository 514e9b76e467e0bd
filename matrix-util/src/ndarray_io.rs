use crate::common_io::{read_lines_of_words_delim, write_lines, Delimiter};
use crate::traits::IoOps;
use ndarray::prelude::*;
use std::fmt::{Debug, Display};
use std::str::FromStr;

impl<T> IoOps for Array2<T>
where
    T: FromStr + Display + Clone,
    <T as FromStr>::Err: Debug,
{
    type Scalar = T;
    type Mat = Self;

    fn read_file_delim(
        file: &str,
        delim: impl Into<Delimiter>,
        skip: Option<usize>,
    ) -> anyhow::Result<Self::Mat> {
        let hdr_line = match skip {
            Some(skip) => skip as i64,
            None => -1, // no skipping
        };

        let lines_of_words = read_lines_of_words_delim(file, delim, hdr_line)?.lines;

        if lines_of_words.is_empty() {
            return Err(anyhow::anyhow!("No data in file {}", file));
        }

        let nrows = lines_of_words.len();
        let ncols = lines_of_words[0].len();

        let mut data = Vec::with_capacity(nrows * ncols);
        for (i, words) in lines_of_words.iter().enumerate() {
            if words.len() != ncols {
                return Err(anyhow::anyhow!(
                    "{}: line {} has {} columns, expected {}",
                    file,
                    i + 1,
                    words.len(),
                    ncols
                ));
            }
            for w in words.iter() {
                let x = w
                    .parse::<T>()
                    .map_err(|e| anyhow::anyhow!("{}: failed to parse {:?}: {:?}", file, w, e))?;
                data.push(x);
            }
        }

        Ok(Array2::from_shape_vec((nrows, ncols), data)?)
    }

    fn write_file_delim(&self, file: &str, delim: &str) -> anyhow::Result<()> {
        let lines: Vec<Box<str>> = self
            .rows()
            .into_iter()
            .map(|row| {
                row.iter()
                    .map(|x| format!("{}", x))
                    .collect::<Vec<String>>()
                    .join(delim)
                    .into_boxed_str()
            })
            .collect();
        write_lines(&lines, file)?;
        Ok(())
    }
}

//! Ingestion of HYG-style star catalogs: CSV with a header row naming the
//! columns, one star per row.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::debug;

use crate::error::Result;
use crate::star::StarRecord;

/// Parse every row of `reader` into a [`StarRecord`].
pub fn read_stars<R: Read>(reader: R) -> Result<Vec<StarRecord>> {
    read_filtered(reader, |_| true)
}

/// Parse rows and keep only stars within `cutoff_pc` of the reference
/// origin. Rows outside the cutoff are still validated.
pub fn read_stars_within<R: Read>(reader: R, cutoff_pc: f64) -> Result<Vec<StarRecord>> {
    read_filtered(reader, |star| star.dist <= cutoff_pc)
}

pub fn read_stars_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<StarRecord>> {
    let file = File::open(path)?;
    read_stars(file)
}

fn read_filtered<R, F>(reader: R, keep: F) -> Result<Vec<StarRecord>>
where
    R: Read,
    F: Fn(&StarRecord) -> bool,
{
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::Headers).from_reader(reader);
    let headers = rdr.headers()?.clone();

    let mut stars = Vec::new();
    let mut rows = 0usize;
    for record in rdr.records() {
        let record = record?;
        rows += 1;
        let star = StarRecord::from_fields(headers.iter().zip(record.iter()))?;
        if keep(&star) {
            stars.push(star);
        }
    }

    debug!("read {} catalog rows, kept {}", rows, stars.len());
    Ok(stars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    const SAMPLE: &str = "\
id,hip,hd,hr,gl,bf,proper,ra,dec,dist,mag,spect
0,,,,,,Sol,0.0,0.0,0.0,-26.7,G2V
70667,70890,,,Gl 551,,Proxima Centauri,217.429,-62.679,1.295,11.01,M5Ve
71453,71681,128621,5460,Gl 559B,,Rigil Kentaurus B,219.914,-60.839,1.347,1.35,K1V
87666,87937,,,Gl 699,,Barnard's Star,269.452,4.693,1.823,9.54,sdM4
32263,32349,48915,2491,Gl 244A,9Alp CMa,Sirius,101.287,-16.716,2.637,-1.44,A0m...
";

    #[test]
    fn reads_all_rows() {
        let stars = read_stars(SAMPLE.as_bytes()).expect("stars");
        assert_eq!(stars.len(), 5);
        assert_eq!(stars[1].display_name().as_deref(), Some("Proxima Centauri"));
        assert_eq!(stars[4].bf.as_deref(), Some("9Alp CMa"));
        assert_eq!(stars[0].spect.as_deref(), Some("G2V"));
        assert_eq!(stars[3].mag, Some(9.54));
    }

    #[test]
    fn cutoff_filters_while_reading() {
        let stars = read_stars_within(SAMPLE.as_bytes(), 2.0).expect("stars");
        let names: Vec<String> = stars.iter().map(StarRecord::label).collect();
        assert_eq!(names, vec!["Sol", "Proxima Centauri", "Rigil Kentaurus B", "Barnard's Star"]);
    }

    #[test]
    fn unknown_column_fails() {
        let csv = "id,ra,dec,dist,tyc\n1,0,0,1,1234\n";
        let err = read_stars(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::UnknownField { field } if field == "tyc"));
    }

    #[test]
    fn bad_number_fails() {
        let csv = "id,ra,dec,dist\n1,0,zero,1\n";
        let err = read_stars(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::InvalidNumber { field, .. } if field == "dec"));
    }
}

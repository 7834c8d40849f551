use std::fmt::Debug;
use thiserror::Error;
use tracing::{error, warn};

/// Everything that can go wrong while ingesting, persisting or rendering annotations. None of
/// these are recovered from, the binaries log them and exit with a non-zero code.
#[derive(Error, Debug)]
pub enum BirdError {
    #[error("no species abbreviation followed by 3 digits in filename {image_id:?}")]
    MalformedFilename { image_id: String },
    #[error("abbreviation {abbreviation:?} of {image_id:?} is not in the abbreviation table")]
    UnknownAbbreviation {
        image_id: String,
        abbreviation: String,
    },
    #[error("annotation was inconclusive for {image_id}")]
    InconclusiveRenderRequested { image_id: String },
    #[error("no annotation found for {image_id}")]
    MissingAnnotation { image_id: String },
    #[error("malformed csv row {row}, {reason}")]
    MalformedRow { row: usize, reason: String },
    #[error("polygon of {image_id} has {n_points} points, at least 3 are needed")]
    DegeneratePolygon { image_id: String, n_points: usize },
    #[error("annotation store has version {found}, expected {expected}")]
    UnsupportedStoreVersion { found: u32, expected: u32 },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Image(#[from] image::ImageError),
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
    #[error("{0}")]
    Other(String),
}
impl BirdError {
    pub fn new(msg: &str) -> BirdError {
        BirdError::Other(msg.to_string())
    }
}
impl From<&str> for BirdError {
    fn from(value: &str) -> Self {
        BirdError::new(value)
    }
}

/// birdpoly's result type with [`BirdError`](BirdError) as error type.
pub type BirdResult<U> = Result<U, BirdError>;

pub fn trace_ok_err<T, E>(x: Result<T, E>) -> Option<T>
where
    E: Debug,
{
    match x {
        Ok(x) => Some(x),
        Err(e) => {
            error!("{e:?}");
            None
        }
    }
}
pub fn trace_ok_warn<T, E>(x: Result<T, E>) -> Option<T>
where
    E: Debug,
{
    match x {
        Ok(x) => Some(x),
        Err(e) => {
            warn!("{e:?}");
            None
        }
    }
}

/// Creates a [`BirdError::Other`](BirdError) with a formatted message.
/// ```rust
/// use birdlib::{birderr, result::BirdError};
/// let e = birderr!("some error {}", 1);
/// assert_eq!(e.to_string(), "some error 1");
/// ```
#[macro_export]
macro_rules! birderr {
    ($s:literal) => {
        $crate::result::BirdError::new(format!($s).as_str())
    };
    ($s:literal, $( $exps:expr ),*) => {
        $crate::result::BirdError::new(format!($s, $($exps,)*).as_str())
    }
}

pub fn to_bird<E: Debug>(e: E) -> BirdError {
    birderr!("{:?}", e)
}

#[test]
fn test_messages() {
    let e = BirdError::InconclusiveRenderRequested {
        image_id: "BF045_x.jpg".to_string(),
    };
    assert_eq!(e.to_string(), "annotation was inconclusive for BF045_x.jpg");
    let e = to_bird("boom");
    assert_eq!(e.to_string(), "\"boom\"");
    assert_eq!(trace_ok_warn::<u8, _>(Err(e)), None);
    assert_eq!(trace_ok_err::<_, BirdError>(Ok(3)), Some(3));
}

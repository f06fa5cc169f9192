use serde::Deserialize;

/// `?interval=day|week|month|year`; anything else lists everything.
#[derive(Debug, Default, Deserialize)]
pub struct IntervalQuery {
    pub interval: Option<String>,
}

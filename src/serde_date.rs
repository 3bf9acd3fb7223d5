//! `YYYY-MM-DD` serde for [`time::Date`], for use with
//! `#[serde(with = "crate::serde_date::calendar_date")]` (or its `option` submodule).

time::serde::format_description!(pub calendar_date, Date, "[year]-[month]-[day]");

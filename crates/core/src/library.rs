//! Sample entries for the "My Videos" listing.
//!
//! Generated videos are never stored, so the listing is a fixed set of
//! sample items.

use chrono::NaiveDate;
use serde::Serialize;

/// One entry in the video library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoItem {
    pub id: String,
    pub title: String,
    pub thumbnail: String,
    pub created_at: NaiveDate,
    /// Display duration, `m:ss`.
    pub duration: String,
}

/// Only used in const items, so an invalid date fails the build.
const fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    match NaiveDate::from_ymd_opt(year, month, day) {
        Some(date) => date,
        None => panic!("invalid sample library date"),
    }
}

const ENCHANTED_FOREST_DATE: NaiveDate = date(2023, 7, 15);
const JOURNEY_TO_THE_STARS_DATE: NaiveDate = date(2023, 7, 12);
const LOST_CITY_DATE: NaiveDate = date(2023, 7, 10);

/// The sample library, newest first.
pub fn sample_library() -> Vec<VideoItem> {
    [
        (
            "1",
            "The Enchanted Forest",
            "https://images.unsplash.com/photo-1579546929518-9e396f3cc809?w=800&q=80",
            ENCHANTED_FOREST_DATE,
            "1:24",
        ),
        (
            "2",
            "Journey to the Stars",
            "https://images.unsplash.com/photo-1560800452-f2d475982b96?w=800&q=80",
            JOURNEY_TO_THE_STARS_DATE,
            "2:15",
        ),
        (
            "3",
            "The Lost City",
            "https://images.unsplash.com/photo-1580477667995-2b94f01c9516?w=800&q=80",
            LOST_CITY_DATE,
            "3:42",
        ),
    ]
    .into_iter()
    .map(|(id, title, thumbnail, created_at, duration)| VideoItem {
        id: id.to_string(),
        title: title.to_string(),
        thumbnail: thumbnail.to_string(),
        created_at,
        duration: duration.to_string(),
    })
    .collect()
}

/// Find a library entry by id.
pub fn find_video(id: &str) -> Option<VideoItem> {
    sample_library().into_iter().find(|v| v.id == id)
}

//! Song transform: derives the songs and artists tables from song metadata.

use indexmap::IndexMap;
use tracing::debug;

use crate::model::SongRecord;
use crate::tables::{ArtistRow, SongRow};

/// Output of the song transform.
#[derive(Debug)]
pub struct SongTables {
    pub songs: Vec<SongRow>,
    pub artists: Vec<ArtistRow>,
}

/// Derive the songs and artists tables.
///
/// The songs table is a straight projection, one row per record. The artists
/// table is deduplicated on `artist_id`; when attributes drift across records
/// for the same artist, the first occurrence in input order is the
/// representative.
pub fn transform_songs(records: &[SongRecord]) -> SongTables {
    let songs: Vec<SongRow> = records
        .iter()
        .map(|record| SongRow {
            song_id: record.song_id.clone(),
            title: record.title.clone(),
            artist_id: record.artist_id.clone(),
            year: record.year,
            duration: record.duration,
        })
        .collect();

    let mut artists: IndexMap<String, ArtistRow> = IndexMap::new();
    for record in records {
        artists
            .entry(record.artist_id.clone())
            .or_insert_with(|| ArtistRow {
                artist_id: record.artist_id.clone(),
                artist_name: record.artist_name.clone(),
                artist_location: record.artist_location.clone(),
                artist_latitude: record.artist_latitude,
                artist_longitude: record.artist_longitude,
            });
    }

    debug!(
        songs = songs.len(),
        artists = artists.len(),
        "Song transform complete"
    );

    SongTables {
        songs,
        artists: artists.into_values().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(song_id: &str, artist_id: &str, artist_name: &str, latitude: Option<f64>) -> SongRecord {
        SongRecord {
            song_id: song_id.to_string(),
            title: format!("title-{song_id}"),
            artist_id: artist_id.to_string(),
            artist_name: artist_name.to_string(),
            artist_location: None,
            artist_latitude: latitude,
            artist_longitude: None,
            year: 2005,
            duration: 200.0,
        }
    }

    #[test]
    fn test_songs_one_row_per_record() {
        let records = [
            record("S1", "A1", "Coldplay", None),
            record("S2", "A1", "Coldplay", None),
            record("S3", "A2", "Oasis", None),
        ];

        let tables = transform_songs(&records);

        assert_eq!(tables.songs.len(), 3);
        let ids: Vec<&str> = tables.songs.iter().map(|s| s.song_id.as_str()).collect();
        assert_eq!(ids, vec!["S1", "S2", "S3"]);
    }

    #[test]
    fn test_artists_deduplicated_by_id() {
        let records = [
            record("S1", "A1", "Coldplay", None),
            record("S2", "A1", "Coldplay", None),
            record("S3", "A2", "Oasis", None),
        ];

        let tables = transform_songs(&records);

        assert_eq!(tables.artists.len(), 2);
        let ids: Vec<&str> = tables.artists.iter().map(|a| a.artist_id.as_str()).collect();
        assert_eq!(ids, vec!["A1", "A2"]);
    }

    #[test]
    fn test_artist_drift_first_occurrence_wins() {
        let records = [
            record("S1", "A1", "Coldplay", Some(51.5)),
            record("S2", "A1", "Coldplay", Some(48.8)),
        ];

        let tables = transform_songs(&records);

        assert_eq!(tables.artists.len(), 1);
        assert_eq!(tables.artists[0].artist_latitude, Some(51.5));
    }

    #[test]
    fn test_empty_input() {
        let tables = transform_songs(&[]);
        assert!(tables.songs.is_empty());
        assert!(tables.artists.is_empty());
    }
}

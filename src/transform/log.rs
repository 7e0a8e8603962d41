//! Log transform: derives the users, time, and songplays tables from
//! activity logs, joining against song metadata for the fact table.

use indexmap::{IndexMap, IndexSet};
use tracing::{debug, warn};

use crate::model::{LogRecord, SongRecord};
use crate::tables::{SongplayRow, TimeRow, UserRow};
use crate::transform::join::SongIndex;
use crate::transform::time::TimeParts;

/// Output of the log transform.
#[derive(Debug)]
pub struct LogTables {
    pub users: Vec<UserRow>,
    pub time: Vec<TimeRow>,
    pub songplays: Vec<SongplayRow>,
    /// Song-play records dropped because their timestamp failed derivation.
    pub skipped_rows: usize,
}

/// Derive the users, time, and songplays tables.
///
/// Only records with `page = 'NextSong'` contribute to any output. A record
/// whose `ts` is missing, malformed, or out of range is dropped from every
/// output and counted in `skipped_rows`; noisy instrumentation data must not
/// abort the run.
pub fn transform_logs(records: &[LogRecord], songs: &[SongRecord]) -> LogTables {
    let index = SongIndex::build(songs);

    let mut users: IndexSet<UserRow> = IndexSet::new();
    let mut time: IndexMap<i64, TimeRow> = IndexMap::new();
    let mut songplays: Vec<SongplayRow> = Vec::new();
    let mut skipped_rows = 0;

    for record in records.iter().filter(|r| r.is_song_play()) {
        let derived = record.ts.and_then(|ts| TimeParts::from_epoch_ms(ts).map(|p| (ts, p)));
        let Some((ts, parts)) = derived else {
            skipped_rows += 1;
            warn!(
                user_id = %record.user_id,
                session_id = ?record.session_id,
                "Dropping song-play record with unusable timestamp"
            );
            continue;
        };

        users.insert(UserRow {
            userid: record.user_id.clone(),
            first_name: record.first_name.clone(),
            last_name: record.last_name.clone(),
            gender: record.gender.clone(),
            level: record.level.clone(),
        });

        time.entry(ts).or_insert_with(|| TimeRow {
            start_time: parts.start_time.clone(),
            hour: parts.hour,
            day: parts.day,
            week: parts.week,
            month: parts.month,
            year: parts.year,
            weekday: parts.weekday,
        });

        let matched = match (&record.artist, &record.song) {
            (Some(artist), Some(song)) => index.lookup(artist, song),
            _ => None,
        };

        songplays.push(SongplayRow {
            start_time: parts.start_time,
            user_id: record.user_id.clone(),
            level: record.level.clone(),
            song_id: matched.map(|(song_id, _)| song_id.to_string()),
            artist_id: matched.map(|(_, artist_id)| artist_id.to_string()),
            session_id: record.session_id,
            location: record.location.clone(),
            user_agent: record.user_agent.clone(),
            year: parts.year,
            month: parts.month,
        });
    }

    debug!(
        users = users.len(),
        time = time.len(),
        songplays = songplays.len(),
        skipped_rows,
        "Log transform complete"
    );

    LogTables {
        users: users.into_iter().collect(),
        time: time.into_values().collect(),
        songplays,
        skipped_rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn song(song_id: &str, title: &str, artist_id: &str, artist_name: &str) -> SongRecord {
        SongRecord {
            song_id: song_id.to_string(),
            title: title.to_string(),
            artist_id: artist_id.to_string(),
            artist_name: artist_name.to_string(),
            artist_location: None,
            artist_latitude: None,
            artist_longitude: None,
            year: 2005,
            duration: 294.0,
        }
    }

    fn play(user_id: &str, artist: &str, title: &str, ts: Option<i64>) -> LogRecord {
        LogRecord {
            user_id: user_id.to_string(),
            first_name: Some("Lily".to_string()),
            last_name: Some("Koch".to_string()),
            gender: Some("F".to_string()),
            level: Some("paid".to_string()),
            ts,
            page: LogRecord::NEXT_SONG.to_string(),
            artist: Some(artist.to_string()),
            song: Some(title.to_string()),
            session_id: Some(818),
            location: Some("Chicago-Naperville-Elgin, IL-IN-WI".to_string()),
            user_agent: Some("Mozilla/5.0".to_string()),
        }
    }

    const TS: i64 = 1541121934796;

    #[test]
    fn test_non_next_song_records_are_ignored() {
        let mut home = play("15", "Coldplay", "Fix You", Some(TS));
        home.page = "Home".to_string();

        let tables = transform_logs(&[home], &[]);

        assert!(tables.users.is_empty());
        assert!(tables.time.is_empty());
        assert!(tables.songplays.is_empty());
        assert_eq!(tables.skipped_rows, 0);
    }

    #[test]
    fn test_join_hit_carries_ids() {
        let songs = [song("S1", "Fix You", "A1", "Coldplay")];
        let logs = [play("15", "Coldplay", "Fix You", Some(TS))];

        let tables = transform_logs(&logs, &songs);

        assert_eq!(tables.songplays.len(), 1);
        let row = &tables.songplays[0];
        assert_eq!(row.song_id.as_deref(), Some("S1"));
        assert_eq!(row.artist_id.as_deref(), Some("A1"));
        assert_eq!(row.start_time, "2018-11-02 01:25:34");
        assert_eq!(row.year, 2018);
        assert_eq!(row.month, 11);
    }

    #[test]
    fn test_join_miss_still_produces_a_row() {
        let songs = [song("S1", "Fix You", "A1", "Coldplay")];
        let logs = [play("15", "Oasis", "Wonderwall", Some(TS))];

        let tables = transform_logs(&logs, &songs);

        assert_eq!(tables.songplays.len(), 1);
        let row = &tables.songplays[0];
        assert_eq!(row.song_id, None);
        assert_eq!(row.artist_id, None);
        assert_eq!(row.user_id, "15");
    }

    #[test]
    fn test_users_distinct() {
        let logs = [
            play("15", "Coldplay", "Fix You", Some(TS)),
            play("15", "Coldplay", "Yellow", Some(TS + 1000)),
            play("20", "Oasis", "Wonderwall", Some(TS + 2000)),
        ];

        let tables = transform_logs(&logs, &[]);

        assert_eq!(tables.users.len(), 2);
        let ids: Vec<&str> = tables.users.iter().map(|u| u.userid.as_str()).collect();
        assert_eq!(ids, vec!["15", "20"]);
    }

    #[test]
    fn test_level_change_produces_distinct_user_rows() {
        let mut free = play("15", "Coldplay", "Fix You", Some(TS));
        free.level = Some("free".to_string());
        let paid = play("15", "Coldplay", "Yellow", Some(TS + 1000));

        let tables = transform_logs(&[free, paid], &[]);

        // Distinct is over the full projected row, not the user id.
        assert_eq!(tables.users.len(), 2);
    }

    #[test]
    fn test_time_one_row_per_distinct_ts() {
        let logs = [
            play("15", "Coldplay", "Fix You", Some(TS)),
            play("20", "Oasis", "Wonderwall", Some(TS)),
            play("15", "Coldplay", "Yellow", Some(TS + 60_000)),
        ];

        let tables = transform_logs(&logs, &[]);

        assert_eq!(tables.time.len(), 2);
        assert_eq!(tables.songplays.len(), 3);
        assert_eq!(tables.time[0].start_time, "2018-11-02 01:25:34");
    }

    #[test]
    fn test_unusable_ts_rows_are_skipped_and_counted() {
        let logs = [
            play("15", "Coldplay", "Fix You", Some(TS)),
            play("20", "Oasis", "Wonderwall", None),
            play("25", "Blur", "Song 2", Some(i64::MAX)),
        ];

        let tables = transform_logs(&logs, &[]);

        assert_eq!(tables.skipped_rows, 2);
        assert_eq!(tables.songplays.len(), 1);
        assert_eq!(tables.time.len(), 1);
        // Dropped rows contribute to no output.
        assert_eq!(tables.users.len(), 1);
    }

    #[test]
    fn test_missing_artist_or_song_is_a_join_miss() {
        let songs = [song("S1", "Fix You", "A1", "Coldplay")];
        let mut no_song = play("15", "Coldplay", "Fix You", Some(TS));
        no_song.song = None;

        let tables = transform_logs(&[no_song], &songs);

        assert_eq!(tables.songplays.len(), 1);
        assert_eq!(tables.songplays[0].song_id, None);
    }
}

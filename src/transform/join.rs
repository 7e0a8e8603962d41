//! Song lookup index for the songplays join.
//!
//! Log records carry only artist and song names, so the join against song
//! metadata is a textual match on `(artist_name, title)`. The same pair can
//! appear on several metadata records (re-releases, compilations); the index
//! resolves those collisions with a fixed tie-break so the join never depends
//! on input order: greatest `duration` wins, then smallest `song_id`.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::model::SongRecord;

#[derive(Debug, Clone)]
struct IndexEntry {
    song_id: String,
    artist_id: String,
    duration: f64,
}

/// Index of song metadata keyed by `(artist_name, title)`.
#[derive(Debug, Default)]
pub struct SongIndex {
    entries: HashMap<(String, String), IndexEntry>,
}

impl SongIndex {
    /// Build the index from a song metadata relation.
    pub fn build(songs: &[SongRecord]) -> Self {
        let mut entries: HashMap<(String, String), IndexEntry> = HashMap::new();

        for song in songs {
            let key = (song.artist_name.clone(), song.title.clone());
            let candidate = IndexEntry {
                song_id: song.song_id.clone(),
                artist_id: song.artist_id.clone(),
                duration: song.duration,
            };

            match entries.entry(key) {
                std::collections::hash_map::Entry::Vacant(slot) => {
                    slot.insert(candidate);
                }
                std::collections::hash_map::Entry::Occupied(mut slot) => {
                    if prefer(&candidate, slot.get()) {
                        slot.insert(candidate);
                    }
                }
            }
        }

        Self { entries }
    }

    /// Look up the song and artist ids for an `(artist, song)` pair.
    pub fn lookup(&self, artist: &str, song: &str) -> Option<(&str, &str)> {
        self.entries
            .get(&(artist.to_string(), song.to_string()))
            .map(|entry| (entry.song_id.as_str(), entry.artist_id.as_str()))
    }

    /// Number of distinct `(artist, song)` keys in the index.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Whether `candidate` should replace `current` under the join tie-break.
fn prefer(candidate: &IndexEntry, current: &IndexEntry) -> bool {
    match candidate.duration.partial_cmp(&current.duration) {
        Some(Ordering::Greater) => true,
        Some(Ordering::Less) => false,
        // Equal or not comparable: fall back to the id ordering.
        _ => candidate.song_id < current.song_id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn song(song_id: &str, title: &str, artist_id: &str, artist_name: &str, duration: f64) -> SongRecord {
        SongRecord {
            song_id: song_id.to_string(),
            title: title.to_string(),
            artist_id: artist_id.to_string(),
            artist_name: artist_name.to_string(),
            artist_location: None,
            artist_latitude: None,
            artist_longitude: None,
            year: 2005,
            duration,
        }
    }

    #[test]
    fn test_lookup_hit_and_miss() {
        let index = SongIndex::build(&[song("S1", "Fix You", "A1", "Coldplay", 294.0)]);

        assert_eq!(index.lookup("Coldplay", "Fix You"), Some(("S1", "A1")));
        assert_eq!(index.lookup("Coldplay", "Yellow"), None);
        assert_eq!(index.lookup("Oasis", "Fix You"), None);
    }

    #[test]
    fn test_duplicate_key_prefers_greatest_duration() {
        let records = [
            song("S1", "Fix You", "A1", "Coldplay", 294.0),
            song("S2", "Fix You", "A1", "Coldplay", 301.5),
        ];

        // Same result regardless of insertion order.
        let forward = SongIndex::build(&records);
        let mut reversed = records.to_vec();
        reversed.reverse();
        let backward = SongIndex::build(&reversed);

        assert_eq!(forward.lookup("Coldplay", "Fix You"), Some(("S2", "A1")));
        assert_eq!(backward.lookup("Coldplay", "Fix You"), Some(("S2", "A1")));
    }

    #[test]
    fn test_duration_tie_prefers_smallest_song_id() {
        let records = [
            song("S9", "Fix You", "A1", "Coldplay", 294.0),
            song("S2", "Fix You", "A1", "Coldplay", 294.0),
        ];

        let forward = SongIndex::build(&records);
        let mut reversed = records.to_vec();
        reversed.reverse();
        let backward = SongIndex::build(&reversed);

        assert_eq!(forward.lookup("Coldplay", "Fix You"), Some(("S2", "A1")));
        assert_eq!(backward.lookup("Coldplay", "Fix You"), Some(("S2", "A1")));
    }

    #[test]
    fn test_len() {
        let index = SongIndex::build(&[
            song("S1", "Fix You", "A1", "Coldplay", 294.0),
            song("S2", "Fix You", "A1", "Coldplay", 294.0),
            song("S3", "Yellow", "A1", "Coldplay", 266.0),
        ]);
        assert_eq!(index.len(), 2);
        assert!(!index.is_empty());
    }
}

use std::cmp::Ordering;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::sim::hooks::ScoreRecorder;

const MAGIC: &[u8; 4] = b"RGS1";
pub const MAX_ENTRIES: usize = 10;
pub const NAME_LEN: usize = 9;
// Each entry: 9 bytes name + 4 bytes score + 4 bytes level = 17 bytes
const ENTRY_SIZE: usize = NAME_LEN + 4 + 4;
const SCORES_FILE: &str = "rustgalaga.scores";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreEntry {
    pub name: String,
    pub score: u32,
    pub level: u32,
}

/// Table order: score high to low, then name A-Z, then level high to low.
fn table_order(a: &ScoreEntry, b: &ScoreEntry) -> Ordering {
    b.score
        .cmp(&a.score)
        .then_with(|| a.name.cmp(&b.name))
        .then_with(|| b.level.cmp(&a.level))
}

#[derive(Debug, Clone)]
pub struct HighScores {
    entries: Vec<ScoreEntry>,
    path: PathBuf,
}

impl HighScores {
    pub fn load(path: PathBuf) -> Self {
        let entries = match fs::read(&path) {
            Ok(data) => decode(&data).unwrap_or_else(|| {
                tracing::warn!(path = %path.display(), "ignoring unreadable high-score file");
                Vec::new()
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "could not read high scores");
                Vec::new()
            }
        };
        HighScores { entries, path }
    }

    /// Load from the file next to the executable.
    pub fn load_default() -> Self {
        Self::load(Self::scores_path())
    }

    fn scores_path() -> PathBuf {
        // Store next to the executable
        if let Ok(exe) = std::env::current_exe() {
            if let Some(dir) = exe.parent() {
                return dir.join(SCORES_FILE);
            }
        }
        PathBuf::from(SCORES_FILE)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_file(&self) {
        if let Err(e) = fs::write(&self.path, encode(&self.entries)) {
            tracing::warn!(path = %self.path.display(), error = %e, "could not save high scores");
        }
    }

    /// Check if a score would make the table (without inserting it)
    pub fn qualifies(&self, score: u32) -> bool {
        if score == 0 {
            return false;
        }
        self.entries.len() < MAX_ENTRIES
            || self.entries.last().map_or(true, |last| score > last.score)
    }

    /// Insert a score. Returns true if it made the table.
    pub fn submit(&mut self, name: &str, score: u32, level: u32) -> bool {
        if !self.qualifies(score) {
            return false;
        }
        let name: String = name.trim().chars().take(NAME_LEN).collect();
        self.entries.push(ScoreEntry { name, score, level });
        self.entries.sort_by(table_order);
        self.entries.truncate(MAX_ENTRIES);
        self.write_file();
        tracing::info!(score, level, "high score recorded");
        true
    }

    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }
}

impl ScoreRecorder for HighScores {
    /// The table only takes finished games through `record`; live points
    /// stay with the session.
    fn add_score(&mut self, _points: u32) {}

    fn top(&self, n: usize) -> Vec<ScoreEntry> {
        self.entries.iter().take(n).cloned().collect()
    }

    fn record(&mut self, name: &str, score: u32, level: u32) {
        self.submit(name, score, level);
    }
}

fn encode(entries: &[ScoreEntry]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(4 + 1 + entries.len() * ENTRY_SIZE);
    buf.extend_from_slice(MAGIC);
    buf.push(entries.len().min(MAX_ENTRIES) as u8);
    for entry in entries.iter().take(MAX_ENTRIES) {
        // 9-byte name, zero padded
        let name_bytes = entry.name.as_bytes();
        let len = name_bytes.len().min(NAME_LEN);
        buf.extend_from_slice(&name_bytes[..len]);
        buf.resize(buf.len() + NAME_LEN - len, 0);
        buf.extend_from_slice(&entry.score.to_le_bytes());
        buf.extend_from_slice(&entry.level.to_le_bytes());
    }
    buf
}

fn decode(data: &[u8]) -> Option<Vec<ScoreEntry>> {
    if data.len() < 5 || &data[0..4] != MAGIC {
        return None;
    }
    let count = (data[4] as usize).min(MAX_ENTRIES);
    let body = &data[5..];
    if body.len() < count * ENTRY_SIZE {
        return None;
    }
    let mut entries: Vec<ScoreEntry> = body
        .chunks_exact(ENTRY_SIZE)
        .take(count)
        .map(|chunk| {
            let name = String::from_utf8_lossy(&chunk[..NAME_LEN])
                .trim_end_matches('\0')
                .trim_end()
                .to_string();
            let score = u32::from_le_bytes([chunk[9], chunk[10], chunk[11], chunk[12]]);
            let level = u32::from_le_bytes([chunk[13], chunk[14], chunk[15], chunk[16]]);
            ScoreEntry { name, score, level }
        })
        .collect();
    entries.sort_by(table_order);
    Some(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> (tempfile::TempDir, HighScores) {
        let dir = tempfile::tempdir().unwrap();
        let scores = HighScores::load(dir.path().join(SCORES_FILE));
        (dir, scores)
    }

    #[test]
    fn ties_break_by_name_then_level() {
        let (_dir, mut scores) = table();
        scores.submit("ZED", 500, 1);
        scores.submit("AMY", 500, 1);
        scores.submit("AMY", 500, 3);
        scores.submit("BOB", 900, 2);
        let order: Vec<_> = scores
            .entries()
            .iter()
            .map(|e| (e.name.as_str(), e.level))
            .collect();
        assert_eq!(order, vec![("BOB", 2), ("AMY", 3), ("AMY", 1), ("ZED", 1)]);
    }

    #[test]
    fn table_keeps_the_top_ten() {
        let (_dir, mut scores) = table();
        for i in 1..=12 {
            scores.submit("P", i * 100, 1);
        }
        assert_eq!(scores.entries().len(), MAX_ENTRIES);
        assert_eq!(scores.entries()[0].score, 1200);
        assert_eq!(scores.entries()[9].score, 300);
        assert!(!scores.qualifies(300));
        assert!(scores.qualifies(301));
        assert!(!scores.submit("LOW", 100, 1));
    }

    #[test]
    fn survives_a_reload() {
        let (dir, mut scores) = table();
        scores.submit("LONGPLAYERNAME", 4200, 3);
        let reloaded = HighScores::load(dir.path().join(SCORES_FILE));
        assert_eq!(
            reloaded.entries(),
            &[ScoreEntry {
                name: "LONGPLAYE".to_string(),
                score: 4200,
                level: 3,
            }]
        );
    }

    #[test]
    fn garbage_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SCORES_FILE);
        fs::write(&path, b"RCS2 not ours").unwrap();
        assert!(HighScores::load(path).entries().is_empty());
    }

    #[test]
    fn live_points_only_land_through_record() {
        let (_dir, mut scores) = table();
        scores.add_score(700);
        assert!(scores.top(10).is_empty());
        scores.record("ACE", 700, 2);
        assert_eq!(scores.top(10).len(), 1);
        assert_eq!(scores.entries()[0].score, 700);
    }

    #[test]
    fn zero_never_qualifies() {
        let (_dir, scores) = table();
        assert!(!scores.qualifies(0));
        assert!(scores.qualifies(1));
    }
}

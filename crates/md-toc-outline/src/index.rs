/// Running chapter counters for every open level, shallowest first.
///
/// `counters[0]` belongs to `min_level`, the last entry to the deepest open
/// level. The stack is never empty, so joining it with `.` always yields the
/// dotted number of the most recent chapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterIndex {
    min_level: usize,
    counters: Vec<usize>,
}

impl ChapterIndex {
    pub fn new(min_level: usize) -> Self {
        Self {
            min_level,
            counters: vec![0],
        }
    }

    pub fn min_level(&self) -> usize {
        self.min_level
    }

    pub fn deepest_open(&self) -> usize {
        self.min_level + self.counters.len() - 1
    }

    /// Counters from `min_level` down to the deepest open level.
    pub fn path(&self) -> &[usize] {
        &self.counters
    }

    /// Count a chapter at `level`, closing deeper branches or opening missing
    /// intermediate levels at zero.
    ///
    /// Returns the level that was expected when the header skips one or more
    /// levels on the way down. Levels below `min_level` count as `min_level`.
    pub fn enter(&mut self, level: usize) -> Option<usize> {
        let level = level.max(self.min_level);
        let deepest = self.deepest_open();
        let depth = level - self.min_level;

        let skipped = if level > deepest + 1 {
            Some(deepest + 1)
        } else {
            None
        };

        if level < deepest {
            self.counters.truncate(depth + 1);
        } else if level > deepest {
            self.counters.resize(depth + 1, 0);
        }

        self.counters[depth] += 1;
        skipped
    }

    pub fn dotted(&self) -> String {
        let parts: Vec<String> = self.counters.iter().map(usize::to_string).collect();
        parts.join(".")
    }
}

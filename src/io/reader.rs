//! Feature grouping engine: folds tokenized records into completed
//! [`GffObj`] features.
//!
//! One engine, two traversal policies:
//!
//! * streaming ([`GffReader::next_feature`], or the [`Iterator`] impl):
//!   children are expected right after their parent, or after a parent seen
//!   earlier in the input; one feature is completed per call;
//! * bulk ([`GffReader::read_all`]): the whole input is consumed and children
//!   are routed to their parent through the id index, with duplicate-id
//!   checks.
//!
//! [`GffReader::parse_all`] drains the streaming policy through a
//! keep/discard handler.

use std::cell::RefCell;
use std::fs::File;
use std::io::{
    BufRead,
    BufReader,
    Lines,
};
use std::path::Path;
use std::rc::Rc;

use hashbrown::HashMap;
use log::{
    debug,
    info,
    trace,
};

use crate::data_structs::{
    GffLine,
    GffObj,
    NameRegistry,
    NamesRef,
    SeqStats,
};
use crate::error::{
    GffError,
    Result,
};
use crate::io::config::{
    GffReaderConfig,
    ReadMode,
};

/// Feature handle returned by the streaming policy. Later records may still
/// fold into a feature after it has been handed out.
pub type SharedGffObj = Rc<RefCell<GffObj>>;

/// Answer of a [`GffReader::parse_all`] handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Keep,
    Discard,
}

/// Input lines shorter than this are skipped before tokenizing.
const MIN_LINE_LEN: usize = 10;

pub struct GffReader<R: BufRead> {
    lines:     Lines<R>,
    line_no:   usize,
    names:     NamesRef,
    config:    GffReaderConfig,
    lookahead: Option<GffLine>,
    phash:     HashMap<String, SharedGffObj>,
    gflst:     Vec<SharedGffObj>,
    seq_stats: SeqStats,
    failed:    bool,
}

impl GffReader<BufReader<File>> {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        names: &Rc<NameRegistry>,
        config: GffReaderConfig,
    ) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        debug!("Opened annotation file {}", path.as_ref().display());
        Ok(Self::new(BufReader::new(file), names, config))
    }
}

impl<R: BufRead> GffReader<R> {
    pub fn new(
        reader: R,
        names: &Rc<NameRegistry>,
        config: GffReaderConfig,
    ) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
            names: names.acquire(),
            config,
            lookahead: None,
            phash: HashMap::new(),
            gflst: Vec::new(),
            seq_stats: SeqStats::new(),
            failed: false,
        }
    }

    pub fn config(&self) -> &GffReaderConfig { &self.config }

    pub fn names(&self) -> &NamesRef { &self.names }

    /// Per-contig statistics of the features created so far.
    pub fn seq_stats(&self) -> &SeqStats { &self.seq_stats }

    /// Features collected by [`Self::read_all`] or kept by
    /// [`Self::parse_all`].
    pub fn features(&self) -> &[SharedGffObj] { &self.gflst }

    /// Whether a fatal error has ended the load.
    pub fn is_failed(&self) -> bool { self.failed }

    /// Drops everything collected so far; the reader yields nothing after.
    fn abort(&mut self) {
        self.failed = true;
        self.lookahead = None;
        self.phash.clear();
        self.gflst.clear();
    }

    fn guard<T>(
        &mut self,
        result: Result<T>,
    ) -> Result<T> {
        if result.is_err() {
            self.abort();
        }
        result
    }

    /// Returns the lookahead record, or tokenizes the next data line.
    fn next_line(&mut self) -> Result<Option<GffLine>> {
        if self.failed {
            return Ok(None);
        }
        if let Some(line) = self.lookahead.take() {
            return Ok(Some(line));
        }
        for raw in self.lines.by_ref() {
            let raw = raw?;
            self.line_no += 1;
            let text = raw.trim_start();
            if text.starts_with('#') || raw.len() < MIN_LINE_LEN {
                continue;
            }
            if let Some(line) = GffLine::parse(&raw, self.line_no, self.config.transcripts_only)? {
                return Ok(Some(line));
            }
            trace!("Skipped line {}", self.line_no);
        }
        Ok(None)
    }

    /// Creates a feature from `line` and indexes it under its id.
    fn start_feature(
        &mut self,
        line: &GffLine,
    ) -> Result<SharedGffObj> {
        let obj = GffObj::from_line(&self.names, line, &self.config)?;
        self.seq_stats.register(
            obj.seq_id(),
            obj.seqname()?,
            obj.start(),
            obj.end(),
        );
        trace!("Started feature {} at line {}", obj.id(), line.line_no);
        let obj = Rc::new(RefCell::new(obj));
        let id = obj.borrow().id().to_string();
        self.phash.insert(id, Rc::clone(&obj));
        Ok(obj)
    }

    fn fold_child(
        &mut self,
        obj: &SharedGffObj,
        line: &GffLine,
    ) {
        let mut obj = obj.borrow_mut();
        obj.add_exon_line(
            line,
            self.config.keep_exon_attrs(),
            self.config.merge_close_exons,
        );
        self.seq_stats.extend(obj.seq_id(), obj.start(), obj.end());
    }

    /// Streaming policy: reads until the feature in progress is complete.
    ///
    /// A record without a parent, or whose parent is neither the current
    /// feature nor an indexed one, completes the current feature and is kept
    /// as lookahead for the next call. After a fatal error the reader is
    /// exhausted.
    pub fn next_feature(&mut self) -> Result<Option<SharedGffObj>> {
        let result = self.stream_one();
        self.guard(result)
    }

    fn stream_one(&mut self) -> Result<Option<SharedGffObj>> {
        let mut current: Option<SharedGffObj> = None;
        while let Some(line) = self.next_line()? {
            let Some(obj) = current.clone() else {
                current = Some(self.start_feature(&line)?);
                continue;
            };
            let parent = match line.parent.clone() {
                Some(parent) => parent,
                None => {
                    self.lookahead = Some(line);
                    break;
                },
            };
            if parent == obj.borrow().id() {
                self.fold_child(&obj, &line);
                continue;
            }
            match self.phash.get(&parent).cloned() {
                Some(prev) => {
                    debug!("Line {} belongs to earlier feature {}", line.line_no, parent);
                    self.fold_child(&prev, &line);
                },
                None => {
                    self.lookahead = Some(line);
                    break;
                },
            }
        }
        Ok(current)
    }

    /// Bulk policy: consumes the whole input into the feature list.
    ///
    /// Fails on a repeated top-level id, and on a child whose parent lies on
    /// another contig or strand or further than the configured distance.
    /// A failed load keeps no features.
    pub fn read_all(&mut self) -> Result<()> {
        let result = self.read_remaining();
        self.guard(result)
    }

    fn read_remaining(&mut self) -> Result<()> {
        while let Some(line) = self.next_line()? {
            let Some(parent) = line.parent.clone() else {
                let id = line.id.as_deref().unwrap_or_default();
                if self.phash.contains_key(id) {
                    return Err(GffError::DuplicateId {
                        id:      id.to_string(),
                        line_no: line.line_no,
                        line:    line.line.clone(),
                    });
                }
                let obj = self.start_feature(&line)?;
                self.gflst.push(obj);
                continue;
            };
            match self.phash.get(&parent).cloned() {
                Some(prev) => {
                    self.check_parent(&prev.borrow(), &line)?;
                    self.fold_child(&prev, &line);
                },
                None => {
                    let obj = self.start_feature(&line)?;
                    self.gflst.push(obj);
                },
            }
        }
        self.phash.clear();
        info!(
            "Loaded {} features on {} contigs",
            self.gflst.len(),
            self.seq_stats.len()
        );
        Ok(())
    }

    fn check_parent(
        &self,
        parent: &GffObj,
        line: &GffLine,
    ) -> Result<()> {
        if parent.seqname()?.as_str() != line.seqname || parent.strand() != line.strand {
            return Err(GffError::ParentMismatch {
                id:      parent.id().to_string(),
                line_no: line.line_no,
                line:    line.line.clone(),
            });
        }
        let distance = line.fstart.abs_diff(parent.start());
        if distance > self.config.max_parent_distance {
            return Err(GffError::ParentTooFar {
                id: parent.id().to_string(),
                distance,
                line_no: line.line_no,
                line: line.line.clone(),
            });
        }
        Ok(())
    }

    /// Runs the streaming policy to the end of the input, passing every
    /// completed feature to `handler`. Kept features go to the feature list;
    /// discarded ones are dropped from the index. Returns the number kept.
    pub fn parse_all<F>(
        &mut self,
        mut handler: F,
    ) -> Result<usize>
    where
        F: FnMut(&GffObj) -> Verdict, {
        let mut kept = 0;
        while let Some(obj) = self.next_feature()? {
            let id = obj.borrow().id().to_string();
            if obj.borrow().exon_count() == 0 {
                debug!("Dropping feature {} without segments", id);
                self.phash.remove(&id);
                continue;
            }
            let verdict = handler(&obj.borrow());
            match verdict {
                Verdict::Keep => {
                    self.gflst.push(obj);
                    kept += 1;
                },
                Verdict::Discard => {
                    self.phash.remove(&id);
                },
            }
        }
        self.phash.clear();
        info!("Kept {} features on {} contigs", kept, self.seq_stats.len());
        Ok(kept)
    }

    /// Loads the whole input with the configured [`ReadMode`] and returns
    /// the features in input order.
    pub fn load(&mut self) -> Result<Vec<GffObj>> {
        match self.config.mode {
            ReadMode::Bulk => self.read_all()?,
            ReadMode::Streaming => {
                self.parse_all(|_| Verdict::Keep)?;
            },
        }
        for stat in self.seq_stats.sorted() {
            debug!(
                "{}: {} features in {}-{}",
                stat.name, stat.fcount, stat.mincoord, stat.maxcoord
            );
        }
        Ok(self.take_features())
    }

    /// Moves the collected features out of the reader.
    pub fn take_features(&mut self) -> Vec<GffObj> {
        self.gflst
            .drain(..)
            .map(|obj| {
                Rc::try_unwrap(obj)
                    .map(RefCell::into_inner)
                    .unwrap_or_else(|shared| RefCell::clone(&shared).into_inner())
            })
            .collect()
    }
}

impl<R: BufRead> Iterator for GffReader<R> {
    type Item = Result<SharedGffObj>;

    fn next(&mut self) -> Option<Self::Item> { self.next_feature().transpose() }
}

//! Line-based statement reconstruction.
//!
//! Text statements have no table structure and a single operation may be
//! spread over several lines. Each page is run through a small state machine:
//! a line starting with a date opens a new block, any other line extends the
//! open block's description.
//!
//! State never crosses a page boundary. A description split exactly at a page
//! break loses its tail: the continuation at the top of the next page has no
//! open block and is discarded.

use tracing::{debug, trace};

use super::head_line::HeadLineDecoder;
use super::ParseStats;
use crate::cleaner::DescriptionCleaner;
use crate::models::transaction::DecodedTransaction;

/// Reconstructs transactions from pages of text lines.
#[derive(Debug, Clone, Copy)]
pub struct LineReconstructor<'a> {
    decoder: &'a HeadLineDecoder,
    cleaner: &'a DescriptionCleaner,
}

impl<'a> LineReconstructor<'a> {
    pub fn new(decoder: &'a HeadLineDecoder, cleaner: &'a DescriptionCleaner) -> Self {
        Self { decoder, cleaner }
    }

    /// Reconstruct all transactions on one page, in physical order.
    pub fn reconstruct_page(
        &self,
        page_num: usize,
        lines: &[String],
        stats: &mut ParseStats,
    ) -> Vec<DecodedTransaction> {
        let mut page = PageState::new(self.decoder, self.cleaner);

        for line in lines {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            page.feed(line);
        }

        let (transactions, page_stats) = page.finish();
        debug!(
            "Page {}: parsed={}, rejected heads={}, orphan lines={}",
            page_num, transactions.len(), page_stats.rejected_heads, page_stats.orphan_lines
        );

        stats.rejected_heads += page_stats.rejected_heads;
        stats.orphan_lines += page_stats.orphan_lines;
        transactions
    }
}

enum BlockState {
    /// No open transaction.
    Idle,
    /// A transaction block accumulating description text.
    Open(DecodedTransaction),
}

#[derive(Default)]
struct PageCounters {
    rejected_heads: usize,
    orphan_lines: usize,
}

/// State for a single page; dropped when the page ends.
struct PageState<'a> {
    decoder: &'a HeadLineDecoder,
    cleaner: &'a DescriptionCleaner,
    state: BlockState,
    done: Vec<DecodedTransaction>,
    counters: PageCounters,
}

impl<'a> PageState<'a> {
    fn new(decoder: &'a HeadLineDecoder, cleaner: &'a DescriptionCleaner) -> Self {
        Self {
            decoder,
            cleaner,
            state: BlockState::Idle,
            done: Vec::new(),
            counters: PageCounters::default(),
        }
    }

    fn feed(&mut self, line: &str) {
        if self.decoder.is_start(line) {
            self.flush();
            match self.decoder.decode(line) {
                Some(head) => self.state = BlockState::Open(head),
                None => {
                    trace!("Rejected head line: {:?}", line);
                    self.counters.rejected_heads += 1;
                }
            }
            return;
        }

        match &mut self.state {
            BlockState::Open(tx) => {
                tx.description.push(' ');
                tx.description.push_str(line);
            }
            BlockState::Idle => {
                trace!("Discarded line outside a block: {:?}", line);
                self.counters.orphan_lines += 1;
            }
        }
    }

    fn flush(&mut self) {
        if let BlockState::Open(mut tx) = std::mem::replace(&mut self.state, BlockState::Idle) {
            tx.description = self.cleaner.clean(&tx.description);
            self.done.push(tx);
        }
    }

    fn finish(mut self) -> (Vec<DecodedTransaction>, PageCounters) {
        self.flush();
        (self.done, self.counters)
    }
}

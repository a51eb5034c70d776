//! Fixed-size block pulling for host audio graphs.

use crate::common::BlockSource;

/// Samples per block in the usual microcontroller audio graph.
pub const AUDIO_BLOCK_SAMPLES: usize = 128;

/// Wraps a `BlockSource` with its own block buffer, so a host can simply
/// ask for the next `count` samples.
///
/// The buffer is a fixed array inside the stream; pulling never allocates.
///
/// # Examples
///
/// ```
/// use tonewheel::{AUDIO_BLOCK_SAMPLES, BlockStream, ToneGenerator};
///
/// let organ = ToneGenerator::<44100>::new().unwrap();
/// let mut stream: BlockStream<_, AUDIO_BLOCK_SAMPLES> = BlockStream::new(organ);
///
/// let block = stream.pull(AUDIO_BLOCK_SAMPLES);
/// assert_eq!(block.len(), AUDIO_BLOCK_SAMPLES);
/// ```
pub struct BlockStream<S: BlockSource, const N: usize> {
    source: S,
    block: [i16; N],
}

impl<S: BlockSource, const N: usize> BlockStream<S, N> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            block: [0; N],
        }
    }

    /// Renders the next `count` samples and returns exactly that many.
    ///
    /// `count` must not exceed the block size `N`. Debug builds panic on a
    /// larger `count`; release builds render and return only `N` samples.
    pub fn pull(&mut self, count: usize) -> &[i16] {
        debug_assert!(
            count <= N,
            "pull of {} samples exceeds the block size of {}",
            count,
            N
        );
        let block = &mut self.block[..count.min(N)];
        self.source.fill(block);
        block
    }

    /// The wrapped source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// The wrapped source, mutably.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Unwraps the stream, returning the source.
    pub fn into_inner(self) -> S {
        self.source
    }
}

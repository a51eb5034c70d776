//! The audio path must not touch the heap.

use std::alloc::{GlobalAlloc, Layout, System};
use std::cell::Cell;

use tonewheel::{AUDIO_BLOCK_SAMPLES, BlockSource, BlockStream, Registration, ToneGenerator};

/// Counts heap allocations made by the current thread.
struct CountingAllocator;

thread_local! {
    static ALLOCATIONS: Cell<usize> = const { Cell::new(0) };
}

fn count_allocation() {
    let _ = ALLOCATIONS.try_with(|count| count.set(count.get() + 1));
}

fn allocations() -> usize {
    ALLOCATIONS.with(Cell::get)
}

unsafe impl GlobalAlloc for CountingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        count_allocation();
        unsafe { System.alloc(layout) }
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        unsafe { System.dealloc(ptr, layout) }
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        count_allocation();
        unsafe { System.realloc(ptr, layout, new_size) }
    }
}

#[global_allocator]
static ALLOCATOR: CountingAllocator = CountingAllocator;

#[test]
fn test_fill_does_not_allocate() {
    let mut organ = ToneGenerator::<44100>::new().unwrap();
    let controls = organ.controls();
    let mut block = [0i16; AUDIO_BLOCK_SAMPLES];

    let before = allocations();
    controls.set_registration(Registration::FULL);
    for key in [12, 19, 24, 31] {
        controls.press_key(key).unwrap();
    }
    organ.fill(&mut block);
    controls.set_volume(0, 3).unwrap();
    controls.release_key(19).unwrap();
    organ.fill(&mut block);
    organ.fill(&mut block[..17]);
    let after = allocations();

    assert_eq!(after - before, 0, "fill allocated {} times", after - before);
    assert!(block.iter().any(|&s| s != 0));
}

#[test]
fn test_pull_does_not_allocate() {
    let organ = ToneGenerator::<44100>::new().unwrap();
    organ.set_registration("88 8000 000".parse().unwrap());
    organ.press_key(24).unwrap();
    let mut stream: BlockStream<_, AUDIO_BLOCK_SAMPLES> = BlockStream::new(organ);

    let before = allocations();
    let mut nonzero = false;
    for _ in 0..8 {
        nonzero |= stream.pull(AUDIO_BLOCK_SAMPLES).iter().any(|&s| s != 0);
    }
    let after = allocations();

    assert_eq!(after - before, 0, "pull allocated {} times", after - before);
    assert!(nonzero);
}

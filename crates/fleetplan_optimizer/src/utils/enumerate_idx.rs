use std::iter::{Enumerate, Map};

type WithIdx<I, Idx> =
    Map<Enumerate<I>, fn((usize, <I as Iterator>::Item)) -> (Idx, <I as Iterator>::Item)>;

/// Typed counterpart of [`Iterator::enumerate`].
pub trait EnumerateIdx: Iterator + Sized {
    fn enumerate_idx<Idx: From<usize>>(self) -> WithIdx<Self, Idx> {
        let with_idx: fn((usize, Self::Item)) -> (Idx, Self::Item) =
            |(position, item)| (Idx::from(position), item);
        self.enumerate().map(with_idx)
    }
}

impl<I: Iterator> EnumerateIdx for I {}

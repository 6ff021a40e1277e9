use core::{fmt, marker::PhantomData, mem};

use serde_core::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{self, SeqAccess, Visitor},
    ser::SerializeSeq,
};

use crate::{AlignedAlloc, BoolSlot, HeapBuf, SvoVec, align::Alignment};

/// Upper bound on what an untrusted length hint may allocate up front.
const MAX_PREALLOC_BYTES: usize = 1024 * 1024;

impl<T: Serialize, const K: usize, A: Alignment, M: AlignedAlloc> Serialize for SvoVec<T, K, A, M> {
    /// Serialize a `SvoVec` as a sequence.
    ///
    /// The format is identical in both modes.
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for element in self {
            seq.serialize_element(element)?;
        }
        seq.end()
    }
}

impl<'de, T, const K: usize, A, M> Deserialize<'de> for SvoVec<T, K, A, M>
where
    T: Deserialize<'de>,
    A: Alignment,
    M: AlignedAlloc + Default,
{
    /// Deserialize a `SvoVec` from a sequence.
    ///
    /// Sequences longer than `K` end up on the heap.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct SvoVecVisitor<T, const K: usize, A, M> {
            _marker: PhantomData<(T, A, M)>,
        }

        impl<'de, T, const K: usize, A, M> Visitor<'de> for SvoVecVisitor<T, K, A, M>
        where
            T: Deserialize<'de>,
            A: Alignment,
            M: AlignedAlloc + Default,
        {
            type Value = SvoVec<T, K, A, M>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a sequence")
            }

            fn visit_seq<S>(self, mut seq: S) -> Result<Self::Value, S::Error>
            where
                S: SeqAccess<'de>,
            {
                let cap = MAX_PREALLOC_BYTES / mem::size_of::<T>().max(1);
                let hint = seq.size_hint().map_or(0, |hint| hint.min(cap));
                if hint <= K {
                    let mut vec = SvoVec::default();
                    while let Some(element) = seq.next_element()? {
                        vec.push(element);
                    }
                    return Ok(vec);
                }

                // Long sequences go straight to one heap block.
                let alloc = M::default();
                let mut heap =
                    HeapBuf::try_with_capacity_in(hint, alloc.clone()).map_err(de::Error::custom)?;
                while let Some(element) = seq.next_element()? {
                    heap.push(element);
                }
                Ok(SvoVec::from_heap(heap, alloc))
            }
        }

        deserializer.deserialize_seq(SvoVecVisitor {
            _marker: PhantomData,
        })
    }
}

impl Serialize for BoolSlot {
    #[inline]
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_bool(self.value)
    }
}

impl<'de> Deserialize<'de> for BoolSlot {
    #[inline]
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        bool::deserialize(deserializer).map(BoolSlot::new)
    }
}

//! A write queue for delaying writes into the coverage buffer.
//!
//! Occluders are appended with the box they cover and their depth, in any
//! order. Before something is tested, [`WriteQueue::fetch`] hands back the
//! nearest queued occluder that overlaps the test box and is in front of it,
//! so only occluders that can matter get written.
//!
//! The queue is a doubly linked list over an index arena. Unlinked elements
//! go onto a singly linked free list and are reused by later appends.

use crate::float_types::Real;
use crate::geometry::Box2;
use std::fmt;

#[derive(Debug, Clone)]
struct WriteQueueElement<T> {
    next: Option<usize>,
    prev: Option<usize>,
    bbox: Box2,
    depth: Real,
    obj: Option<T>,
}

/// Depth ordered queue of pending `(box, depth, obj)` writes.
///
/// `obj` is an opaque handle to whoever owns the occluder; the queue never
/// looks at it.
#[derive(Debug, Clone)]
pub struct WriteQueue<T> {
    elements: Vec<WriteQueueElement<T>>,
    // Free elements, linked through `next`. `prev` is unused there.
    free_elements: Option<usize>,
    // Lowest depth. `next` points towards higher depth values.
    queue_min: Option<usize>,
    // Highest depth.
    queue_max: Option<usize>,
    len: usize,
}

impl<T> Default for WriteQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> WriteQueue<T> {
    /// Create a new, empty write queue.
    pub const fn new() -> Self {
        Self {
            elements: Vec::new(),
            free_elements: None,
            queue_min: None,
            queue_max: None,
            len: 0,
        }
    }

    /// Empty the queue, keeping its elements for reuse.
    pub fn initialize(&mut self) {
        let mut cursor = self.queue_min;
        while let Some(index) = cursor {
            cursor = self.elements[index].next;
            self.release(index);
        }
        self.queue_min = None;
        self.queue_max = None;
        self.len = 0;
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn acquire(&mut self, bbox: Box2, depth: Real, obj: T) -> usize {
        match self.free_elements {
            Some(index) => {
                let element = &mut self.elements[index];
                self.free_elements = element.next;
                *element = WriteQueueElement {
                    next: None,
                    prev: None,
                    bbox,
                    depth,
                    obj: Some(obj),
                };
                index
            },
            None => {
                self.elements.push(WriteQueueElement {
                    next: None,
                    prev: None,
                    bbox,
                    depth,
                    obj: Some(obj),
                });
                self.elements.len() - 1
            },
        }
    }

    fn release(&mut self, index: usize) -> Option<T> {
        let element = &mut self.elements[index];
        let obj = element.obj.take();
        element.prev = None;
        element.next = self.free_elements;
        self.free_elements = Some(index);
        obj
    }

    /// Append something to the queue, keeping it sorted on depth.
    ///
    /// Scans from the far end, so equal depths keep their arrival order.
    pub fn append(&mut self, bbox: Box2, depth: Real, obj: T) {
        let index = self.acquire(bbox, depth, obj);

        // last element that is not farther than the new one
        let mut after = self.queue_max;
        while let Some(cursor) = after {
            if self.elements[cursor].depth <= depth {
                break;
            }
            after = self.elements[cursor].prev;
        }

        let before = match after {
            Some(cursor) => self.elements[cursor].next,
            None => self.queue_min,
        };

        self.elements[index].prev = after;
        self.elements[index].next = before;
        match after {
            Some(cursor) => self.elements[cursor].next = Some(index),
            None => self.queue_min = Some(index),
        }
        match before {
            Some(cursor) => self.elements[cursor].prev = Some(index),
            None => self.queue_max = Some(index),
        }
        self.len += 1;
    }

    fn unlink(&mut self, index: usize) {
        let (prev, next) = (self.elements[index].prev, self.elements[index].next);
        match prev {
            Some(cursor) => self.elements[cursor].next = next,
            None => self.queue_min = next,
        }
        match next {
            Some(cursor) => self.elements[cursor].prev = prev,
            None => self.queue_max = prev,
        }
        self.len -= 1;
    }

    /// Fetch an object from the queue that can potentially help occlusion
    /// for the given box and depth: its box must intersect `bbox` and its
    /// depth must be smaller than `depth`. The nearest such object is removed
    /// from the queue and returned together with its depth.
    pub fn fetch(&mut self, bbox: &Box2, depth: Real) -> Option<(T, Real)> {
        let mut cursor = self.queue_min;
        while let Some(index) = cursor {
            let element = &self.elements[index];
            if element.depth >= depth {
                return None;
            }
            if element.bbox.intersects(bbox) {
                let found_depth = element.depth;
                self.unlink(index);
                return self.release(index).map(|obj| (obj, found_depth));
            }
            cursor = element.next;
        }
        None
    }

    /// Queued entries from nearest to farthest.
    pub fn iter(&self) -> impl Iterator<Item = (&Box2, Real, &T)> + '_ {
        let mut cursor = self.queue_min;
        std::iter::from_fn(move || {
            let index = cursor?;
            let element = &self.elements[index];
            cursor = element.next;
            element
                .obj
                .as_ref()
                .map(|obj| (&element.bbox, element.depth, obj))
        })
    }
}

impl<T: fmt::Debug> fmt::Display for WriteQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "write queue: {} pending", self.len)?;
        for (bbox, depth, obj) in self.iter() {
            writeln!(
                f,
                "  depth {:.3} box ({:.1},{:.1})-({:.1},{:.1}) {:?}",
                depth, bbox.mins.x, bbox.mins.y, bbox.maxs.x, bbox.maxs.y, obj
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> Box2 {
        Box2::from_coords(0.0, 0.0, 1.0, 1.0)
    }

    #[test]
    fn freed_elements_are_reused() {
        let mut queue = WriteQueue::new();
        queue.append(unit_box(), 1.0, 'a');
        queue.append(unit_box(), 2.0, 'b');
        assert_eq!(queue.fetch(&unit_box(), 5.0), Some(('a', 1.0)));
        queue.append(unit_box(), 3.0, 'c');
        assert_eq!(queue.elements.len(), 2);
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn initialize_recycles_everything() {
        let mut queue = WriteQueue::new();
        for depth in [3.0, 1.0, 2.0] {
            queue.append(unit_box(), depth, depth as i32);
        }
        queue.initialize();
        assert!(queue.is_empty());
        assert_eq!(queue.iter().count(), 0);
        queue.append(unit_box(), 4.0, 4);
        assert_eq!(queue.elements.len(), 3);
    }
}

//! Intrusive doubly linked recency list.
//!
//! The front of the list holds the most recently used entry and the back the
//! least recently used one. Nodes are heap allocated and addressed by raw
//! pointer so that a hash index can jump straight to a node and relink it in
//! O(1). Capacity is not tracked here; the owning store decides when to pop.

extern crate alloc;

use alloc::boxed::Box;
use core::fmt;
use core::mem;
use core::ptr;

/// A node in the recency list.
///
/// Sentinel nodes at both ends never carry a value.
pub(crate) struct Node<T> {
    val: mem::MaybeUninit<T>,
    prev: *mut Node<T>,
    next: *mut Node<T>,
}

impl<T> Node<T> {
    fn new(val: T) -> Self {
        Node {
            val: mem::MaybeUninit::new(val),
            prev: ptr::null_mut(),
            next: ptr::null_mut(),
        }
    }

    fn sentinel() -> Self {
        Node {
            val: mem::MaybeUninit::uninit(),
            prev: ptr::null_mut(),
            next: ptr::null_mut(),
        }
    }

    /// Returns a reference to the value held by this node.
    ///
    /// # Safety
    ///
    /// Must not be called on a sentinel node.
    pub(crate) unsafe fn value(&self) -> &T {
        // SAFETY: caller guarantees this is not a sentinel, so `val` is initialized.
        unsafe { self.val.assume_init_ref() }
    }

    /// Consumes a detached node and returns its value.
    ///
    /// # Safety
    ///
    /// Must not be called on a sentinel node.
    pub(crate) unsafe fn into_value(self: Box<Self>) -> T {
        // SAFETY: caller guarantees this is not a sentinel, so `val` is initialized.
        unsafe { self.val.assume_init() }
    }
}

/// Doubly linked list ordered by recency of use.
pub(crate) struct RecencyList<T> {
    len: usize,
    head: *mut Node<T>,
    tail: *mut Node<T>,
}

impl<T> RecencyList<T> {
    /// Creates an empty list with its two sentinels linked together.
    pub(crate) fn new() -> Self {
        let head = Box::into_raw(Box::new(Node::sentinel()));
        let tail = Box::into_raw(Box::new(Node::sentinel()));

        // SAFETY: head and tail were just allocated and are valid.
        unsafe {
            (*head).next = tail;
            (*tail).prev = head;
        }

        RecencyList { len: 0, head, tail }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Allocates a node for `val` and links it at the front.
    ///
    /// The returned pointer stays valid until the node is popped or
    /// the list is dropped.
    pub(crate) fn push_front(&mut self, val: T) -> *mut Node<T> {
        let node = Box::into_raw(Box::new(Node::new(val)));
        // SAFETY: node is freshly allocated and not linked anywhere yet.
        unsafe { self.attach_front(node) };
        self.len += 1;
        node
    }

    /// Relinks `node` right after the head sentinel.
    ///
    /// # Safety
    ///
    /// `node` must be a live, non-sentinel node of this list.
    pub(crate) unsafe fn move_to_front(&mut self, node: *mut Node<T>) {
        // SAFETY: head is valid for the lifetime of the list.
        if unsafe { (*self.head).next } == node {
            return;
        }
        // SAFETY: caller guarantees node belongs to this list.
        unsafe {
            self.detach(node);
            self.attach_front(node);
        }
    }

    /// Returns the least recently used value without unlinking it.
    pub(crate) fn back(&self) -> Option<&T> {
        if self.is_empty() {
            return None;
        }
        // SAFETY: the list is non-empty, so tail.prev is a value node.
        unsafe { Some((*(*self.tail).prev).value()) }
    }

    /// Unlinks and returns the least recently used node.
    pub(crate) fn pop_back(&mut self) -> Option<Box<Node<T>>> {
        if self.is_empty() {
            return None;
        }
        // SAFETY: the list is non-empty, so tail.prev is a value node that
        // was allocated through `Box::into_raw` in `push_front`.
        unsafe {
            let last = (*self.tail).prev;
            self.detach(last);
            self.len -= 1;
            Some(Box::from_raw(last))
        }
    }

    /// Drops every value node, keeping the sentinels.
    pub(crate) fn clear(&mut self) {
        while let Some(node) = self.pop_back() {
            // SAFETY: pop_back never yields a sentinel.
            drop(unsafe { node.into_value() });
        }
    }

    /// # Safety
    ///
    /// `node` must be linked into this list.
    unsafe fn detach(&mut self, node: *mut Node<T>) {
        // SAFETY: a linked node always has valid neighbours (at worst the sentinels).
        unsafe {
            (*(*node).prev).next = (*node).next;
            (*(*node).next).prev = (*node).prev;
        }
    }

    /// # Safety
    ///
    /// `node` must be valid and not currently linked into any list.
    unsafe fn attach_front(&mut self, node: *mut Node<T>) {
        // SAFETY: head is valid and head.next is either a value node or the tail.
        unsafe {
            (*node).next = (*self.head).next;
            (*node).prev = self.head;
            (*self.head).next = node;
            (*(*node).next).prev = node;
        }
    }
}

impl<T> Drop for RecencyList<T> {
    fn drop(&mut self) {
        self.clear();
        // SAFETY: the sentinels were allocated in `new` and are freed exactly once here.
        unsafe {
            drop(Box::from_raw(self.head));
            drop(Box::from_raw(self.tail));
        }
    }
}

impl<T> fmt::Debug for RecencyList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecencyList").field("len", &self.len).finish()
    }
}

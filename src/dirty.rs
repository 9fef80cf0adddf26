use std::cell::Cell;
use std::ops;


// A value that remembers whether it was modified since the last repaint.
#[derive(Clone, Debug)]
pub struct Dirty<T> {
    value: T,
    dirty: Cell<bool>,
}

impl<T> Dirty<T> {
    // New values start dirty: nothing has been rendered yet.
    pub fn new(value: T) -> Self { Self { value, dirty: Cell::new(true) } }

    pub fn get_mut(&mut self) -> &mut T {
        self.dirty.set(true);
        &mut self.value
    }

    pub fn replace(&mut self, value: T) -> T {
        self.dirty.set(true);
        std::mem::replace(&mut self.value, value)
    }

    pub fn mark_dirty(&self) { self.dirty.set(true); }

    pub fn is_dirty(&self) -> bool { self.dirty.get() }

    pub fn take_dirt(&self) -> bool { self.dirty.replace(false) }
}

impl<T: Eq> Dirty<T> {
    pub fn set(&mut self, value: T) {
        if self.value != value {
            self.value = value;
            self.dirty.set(true);
        }
    }
}

impl<T> ops::Deref for Dirty<T> {
    type Target = T;
    fn deref(&self) -> &Self::Target { &self.value }
}
// Don't implement `DerefMut`. A call to `get_mut` stresses the fact that it sets the dirty flag.

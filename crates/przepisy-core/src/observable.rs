//! Observable State Cell
//!
//! A single-threaded value with subscribe/notify. Every surface that shows the
//! same state (list page, panel, navbar badge) subscribes to one instance that
//! is passed in, never looked up globally.

use std::cell::RefCell;
use std::rc::Rc;

type Listener<T> = Rc<dyn Fn(&T)>;

pub struct Observable<T> {
    value: RefCell<T>,
    listeners: RefCell<Vec<Listener<T>>>,
}

impl<T: Clone> Observable<T> {
    pub fn new(value: T) -> Self {
        Self {
            value: RefCell::new(value),
            listeners: RefCell::new(Vec::new()),
        }
    }

    /// Current value (cloned)
    pub fn get(&self) -> T {
        self.value.borrow().clone()
    }

    /// Read without cloning
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&*self.value.borrow())
    }

    /// Replace the value and notify
    pub fn set(&self, value: T) {
        *self.value.borrow_mut() = value;
        self.notify();
    }

    /// Mutate in place and notify
    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let result = f(&mut *self.value.borrow_mut());
        self.notify();
        result
    }

    /// Listeners live as long as the cell
    pub fn subscribe(&self, listener: impl Fn(&T) + 'static) {
        self.listeners.borrow_mut().push(Rc::new(listener));
    }

    // Listeners get a snapshot so they may read or write this cell re-entrantly.
    fn notify(&self) {
        let snapshot = self.get();
        let listeners: Vec<Listener<T>> = self.listeners.borrow().clone();
        for listener in listeners {
            listener(&snapshot);
        }
    }
}

impl<T: Clone + Default> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

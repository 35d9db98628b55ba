//! Entity implementation

slotmap::new_key_type! {
    /// Entity identifier
    ///
    /// An opaque generational key. A key whose slot has been freed and reused
    /// never compares equal to the new occupant, which is how hosts detect
    /// instances destroyed behind the pool's back.
    pub struct Entity;
}

use indexmap::IndexMap;
use std::cell::RefCell;
use std::rc::Rc;

use crate::runner::ds::class::ClassRef;
use crate::runner::ds::error::ErrorType;
use crate::runner::ds::value::Value;

pub type ObjectRef = Rc<RefCell<ScriptObject>>;

/// Instance of an ordinary class. Slot storage is sized by the class's
/// variable traits; dynamic properties exist only for dynamic classes.
pub struct ScriptObject {
    class: ClassRef,
    slots: Vec<Value>,
    dynamic_properties: IndexMap<String, Value>,
}
impl ScriptObject {
    pub fn new(class: &ClassRef) -> Self {
        ScriptObject {
            class: class.clone(),
            slots: class.slot_defaults().to_vec(),
            dynamic_properties: IndexMap::new(),
        }
    }

    pub fn new_ref(class: &ClassRef) -> ObjectRef {
        Rc::new(RefCell::new(ScriptObject::new(class)))
    }

    pub fn class(&self) -> &ClassRef {
        &self.class
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn get_slot(&self, slot: usize) -> Result<Value, ErrorType> {
        self.slots.get(slot).cloned().ok_or_else(|| {
            ErrorType::RangeError(format!(
                "Slot {} is out of range for {}",
                slot,
                self.class.name()
            ))
        })
    }

    pub fn set_slot(&mut self, slot: usize, value: Value) -> Result<(), ErrorType> {
        let class_name = self.class.name().clone();
        match self.slots.get_mut(slot) {
            Some(v) => {
                *v = value;
                Ok(())
            }
            None => Err(ErrorType::RangeError(format!(
                "Slot {} is out of range for {}",
                slot, class_name
            ))),
        }
    }

    pub fn get_dynamic(&self, name: &str) -> Option<&Value> {
        self.dynamic_properties.get(name)
    }

    pub fn set_dynamic(&mut self, name: String, value: Value) {
        self.dynamic_properties.insert(name, value);
    }

    pub fn delete_dynamic(&mut self, name: &str) -> bool {
        self.dynamic_properties.shift_remove(name).is_some()
    }

    pub fn dynamic_names(&self) -> impl Iterator<Item = &String> {
        self.dynamic_properties.keys()
    }
}

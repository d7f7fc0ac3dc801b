pub use inventory;

use crate::{ClassId, RegisterError, Registry, Serializable};

/// A registration function collected by `inventory`.
pub struct __AutoRegisterFunc(pub fn(&mut Registry) -> Result<(), RegisterError>);

inventory::collect!(__AutoRegisterFunc);

pub trait __RegisterClass {
    fn __register(registry: &mut Registry) -> Result<(), RegisterError>;
}

impl<T: Serializable> __RegisterClass for T {
    fn __register(registry: &mut Registry) -> Result<(), RegisterError> {
        // Possibly registered already, as a dependency of another class.
        if registry.contains(ClassId::of::<T>()) {
            return Ok(());
        }
        registry.register::<T>()
    }
}

pub(crate) fn __register_classes(registry: &mut Registry) -> Result<(), RegisterError> {
    for func in inventory::iter::<__AutoRegisterFunc> {
        (func.0)(registry)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::{ClassBuilder, ClassId, RegisterError, Registry, RegistryConfig};
    use crate::{Serializable, UnresolvedClass, impl_auto_register};

    #[derive(Default, Serializable)]
    #[serializable(auto_register)]
    struct Wheel {
        #[serializable(schema = vc_schema::integer())]
        size: u16,
    }

    #[derive(Default, Serializable)]
    #[serializable(auto_register)]
    struct Bike {
        #[serializable(class)]
        front: Wheel,
        #[serializable(class)]
        back: Wheel,
    }

    #[derive(Default)]
    struct Bell;

    impl Serializable for Bell {
        fn declare(_: &mut ClassBuilder<'_, Self>) -> Result<(), RegisterError> {
            Ok(())
        }
    }

    impl_auto_register!(Bell);

    #[test]
    fn collects_marked_classes() {
        let mut registry = Registry::with_config(RegistryConfig {
            unresolved_class: UnresolvedClass::Fail,
            ..RegistryConfig::default()
        });

        assert_eq!(registry.auto_register(), Ok(3));
        assert!(registry.contains(ClassId::of::<Wheel>()));
        assert!(registry.contains(ClassId::of::<Bike>()));
        assert!(registry.contains(ClassId::of::<Bell>()));

        // The policy is only overridden during the call.
        assert_eq!(registry.config().unresolved_class, UnresolvedClass::Fail);
        assert_eq!(registry.auto_register(), Ok(0));

        let bike = Bike {
            front: Wheel { size: 26 },
            back: Wheel { size: 28 },
        };
        let record = registry.serialize(&bike).unwrap();
        assert_eq!(record["back"].get("size"), Some(&vc_schema::Value::from(28)));
    }
}

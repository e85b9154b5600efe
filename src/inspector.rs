use crate::descriptor::{format_signature, ClassDescriptor, ClassFlags, MemberInfo};
use crate::error::InspectError;
use crate::provider::{ClassMetadataProvider, MemberMeta};
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Builds [`ClassDescriptor`]s from a metadata provider and memoizes them by
/// the requested identifier. Entries are never evicted; failures are never stored.
pub struct ClassInspector<P> {
    provider: P,
    cache: Mutex<HashMap<String, Arc<ClassDescriptor>>>,
}

impl<P: ClassMetadataProvider> ClassInspector<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Describe `class_name` and hand the outcome to `callback`, which runs
    /// exactly once before this returns. Exactly one argument is `Some`.
    pub fn info<F>(&self, class_name: &str, callback: F)
    where
        F: FnOnce(Option<InspectError>, Option<Arc<ClassDescriptor>>),
    {
        match self.describe(class_name) {
            Ok(descriptor) => callback(None, Some(descriptor)),
            Err(err) => callback(Some(err), None),
        }
    }

    pub fn describe(&self, class_name: &str) -> Result<Arc<ClassDescriptor>, InspectError> {
        if let Some(cached) = self.cached(class_name) {
            return Ok(cached);
        }

        // Built outside the lock; a concurrent build of the same class yields
        // an equal descriptor and the later insert wins.
        let descriptor = Arc::new(self.build(class_name)?);
        self.cache
            .lock()
            .insert(class_name.to_string(), Arc::clone(&descriptor));
        Ok(descriptor)
    }

    pub fn cached(&self, class_name: &str) -> Option<Arc<ClassDescriptor>> {
        self.cache.lock().get(class_name).cloned()
    }

    pub fn cache_len(&self) -> usize {
        self.cache.lock().len()
    }

    fn build(&self, class_name: &str) -> Result<ClassDescriptor, InspectError> {
        let p = &self.provider;
        let class = p.resolve(class_name)?;

        Ok(ClassDescriptor {
            name: p.name(class),
            extends: p.parent(class).unwrap_or_default(),
            implements: p.interface_names(class),
            traits: p.trait_names(class),
            constants: p.constants(class).into_iter().collect(),
            properties: describe_members(p.properties(class)),
            methods: describe_members(p.methods(class)),
            flags: ClassFlags {
                is_abstract: p.is_abstract(class),
                is_cloneable: p.is_cloneable(class),
                is_final: p.is_final(class),
                is_instantiable: p.is_instantiable(class),
                is_interface: p.is_interface(class),
                is_internal: p.is_internal(class),
                is_iterable: p.is_iterable(class),
                is_trait: p.is_trait(class),
                is_user_defined: p.is_user_defined(class),
            },
            path: p.file_name(class),
        })
    }
}

fn describe_members(members: Vec<MemberMeta>) -> BTreeMap<String, MemberInfo> {
    members
        .into_iter()
        .map(|m| {
            (
                format_signature(m.visibility, m.is_static, &m.name),
                MemberInfo {
                    owner: m.declaring_class,
                    comment: m.doc_comment.unwrap_or_default(),
                },
            )
        })
        .collect()
}

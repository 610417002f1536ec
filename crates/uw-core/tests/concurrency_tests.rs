//! Shared helper under concurrent resolution and execution

use std::sync::Arc;
use std::thread;
use uw_core::{AmbiguityNotice, PlanCache, PlanStore, RecordingSink, UpdateSignature, UpdateWithHelper};
use uw_shape::{ConstructorDescriptor, OptionalValue, Shaped, TypeDescriptor};
use uw_test_utils::{NamedAndNumberedType, NamedType};

#[test]
fn test_concurrent_updates_share_one_plan() {
    let cache = Arc::new(PlanCache::new());
    let helper = Arc::new(
        UpdateWithHelper::builder()
            .cache(Arc::clone(&cache) as Arc<dyn PlanStore>)
            .build(),
    );

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let helper = Arc::clone(&helper);
            thread::spawn(move || {
                let source = NamedAndNumberedType::new("test", i);
                let updated = helper
                    .update_with(
                        &source,
                        NamedAndNumberedType::signature(),
                        (OptionalValue::Set(format!("name-{i}")),),
                    )
                    .unwrap();
                (i, updated)
            })
        })
        .collect();

    for handle in handles {
        let (i, updated) = handle.join().unwrap();
        assert_eq!(updated.name, format!("name-{i}"));
        assert_eq!(updated.id, i);
    }
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_plan_executes_from_many_threads() {
    let helper = UpdateWithHelper::new();
    let plan = helper.resolve_plan::<NamedType>(NamedType::signature()).unwrap();
    let source = NamedType::new("shared");

    thread::scope(|scope| {
        for i in 0..8 {
            let plan = Arc::clone(&plan);
            let source = Arc::clone(&source);
            scope.spawn(move || {
                let same = plan
                    .execute(&source, &[OptionalValue::Set("shared".to_string()).erase()])
                    .unwrap();
                assert!(Arc::ptr_eq(&same, &source));

                let changed = plan
                    .execute(&source, &[OptionalValue::Set(format!("v{i}")).erase()])
                    .unwrap();
                assert_eq!(changed.name, format!("v{i}"));
            });
        }
    });
}

/// Both properties match the `name` intent
#[derive(Debug, Clone, PartialEq)]
struct DoublyNamed {
    name: String,
}

impl Shaped for DoublyNamed {
    fn describe() -> TypeDescriptor<Self> {
        TypeDescriptor::builder()
            .property("Name", |d: &DoublyNamed| d.name.clone())
            .property("name", |d: &DoublyNamed| d.name.clone())
            .constructor(
                ConstructorDescriptor::builder("new")
                    .param::<String>("name")
                    .build(|args| Ok(DoublyNamed { name: args.take()? })),
            )
            .build()
    }
}

#[test]
fn test_sink_collects_from_concurrent_resolutions() {
    let sink = Arc::new(RecordingSink::new());
    let helper = Arc::new(UpdateWithHelper::builder().sink(sink.clone()).build());
    let signature = UpdateSignature::builder::<DoublyNamed>()
        .intent::<String>("name")
        .build()
        .unwrap();

    thread::scope(|scope| {
        for _ in 0..4 {
            let helper = Arc::clone(&helper);
            let signature = &signature;
            scope.spawn(move || {
                helper.resolve_uncached::<DoublyNamed>(signature).unwrap();
            });
        }
    });

    assert_eq!(sink.len(), 4);
    assert!(sink.notices().iter().all(|notice| matches!(
        notice,
        AmbiguityNotice::PropertyForIntent { candidates: 2, .. }
    ) && notice.chosen() == "Name"));
}

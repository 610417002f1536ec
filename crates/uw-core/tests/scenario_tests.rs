use std::sync::Arc;
use uw_core::{
    NameMatching, ParameterSource, PlanCache, PlanStore, ResolveError, ResolverConfig,
    UpdateError, UpdateSignature, UpdateWithHelper,
};
use uw_shape::{ConstructError, OptionalValue, Shaped, TypeDescriptor, TypeRef};
use uw_test_utils::{
    create_role, date, FaultyNamedAndNumberedType, FaultyNamedAndPrivateNumberedType,
    FaultyNamedType, NamedAndNumberedType, NamedAndPrivateNumberedType, NamedType, RoleDetails,
    RoleDetailsExt, RoleDetailsExtensions,
};

fn set<T>(value: T) -> OptionalValue<T> {
    OptionalValue::Set(value)
}

#[test]
fn test_single_argument_mapped_to_single_intent() {
    let current = NamedType::new("test");
    let updated = current.update_with(set("test-new".to_string())).unwrap();
    assert_eq!(updated.name, "test-new");
    assert!(!Arc::ptr_eq(&updated, &current));
}

#[test]
fn test_same_data_returns_same_instance() {
    let current = NamedType::new("test");
    let updated = current.update_with(set("test".to_string())).unwrap();
    assert!(Arc::ptr_eq(&updated, &current));
}

#[test]
fn test_no_update_arguments_returns_same_instance() {
    let current = NamedType::new("test");
    let updated = current.update_with(OptionalValue::Unset).unwrap();
    assert!(Arc::ptr_eq(&updated, &current));
}

#[test]
fn test_property_fallback_for_missing_intent() {
    let current = NamedAndNumberedType::new("test", 1);
    let updated = current.update_with(set("test-new".to_string())).unwrap();
    assert_eq!(updated.name, "test-new");
    assert_eq!(updated.id, 1);
}

#[test]
fn test_constructor_default_fallback_for_missing_intent() {
    let current = NamedAndPrivateNumberedType::new("test", 1);
    let updated = current.update_with(set("test-new".to_string())).unwrap();
    assert_eq!(updated.name, "test-new");
    assert_eq!(updated.id(), -1);
}

#[test]
fn test_default_fallback_visible_in_plan() {
    let helper = UpdateWithHelper::new();
    let plan = helper
        .resolve_plan::<NamedAndPrivateNumberedType>(NamedAndPrivateNumberedType::signature())
        .unwrap();
    assert!(matches!(
        plan.parameter_sources()[1],
        ParameterSource::FromDefault(ref default) if default.downcast::<i32>() == Some(-1)
    ));
}

#[test]
fn test_unmappable_intent() {
    let current = FaultyNamedType::new("test");
    let result = current.update_with(set("title".to_string()));
    assert!(matches!(
        result,
        Err(UpdateError::Resolve(ResolveError::UnmappableArgument { ref intent, .. })) if intent == "title"
    ));
}

#[test]
fn test_wrong_value_count() {
    let current = FaultyNamedAndNumberedType::new("test", 1);
    let result = current.update_with(set("test-new".to_string()));
    assert_eq!(
        result,
        Err(UpdateError::ArityMismatch {
            expected: 1,
            actual: 2
        })
    );
}

#[test]
fn test_unsatisfiable_constructor() {
    let current = FaultyNamedAndPrivateNumberedType::new("test", 1);
    let result = current.update_with(set("test-new".to_string()));
    assert!(matches!(
        result,
        Err(UpdateError::Resolve(ResolveError::UnsatisfiableConstructor { .. }))
    ));
    assert_eq!(current.id(), 1);
}

#[derive(Debug, Clone, PartialEq)]
struct Unbuildable {
    name: String,
}

impl Shaped for Unbuildable {
    fn describe() -> TypeDescriptor<Self> {
        TypeDescriptor::builder()
            .property("Name", |u: &Unbuildable| u.name.clone())
            .build()
    }
}

#[test]
fn test_type_without_constructors_is_unsatisfiable() {
    let helper = UpdateWithHelper::new();
    let signature = UpdateSignature::builder::<Unbuildable>()
        .intent::<String>("name")
        .build()
        .unwrap();

    let result = helper.resolve_plan::<Unbuildable>(&signature);
    assert_eq!(
        result.map(|_| ()),
        Err(ResolveError::UnsatisfiableConstructor {
            target: TypeRef::of::<Unbuildable>(),
            signature: "name: String".to_string(),
        })
    );
}

#[test]
fn test_resolution_failures_are_not_cached() {
    let helper = UpdateWithHelper::new();
    for _ in 0..2 {
        let result = helper.resolve_plan::<FaultyNamedType>(FaultyNamedType::signature());
        assert!(matches!(result, Err(ResolveError::UnmappableArgument { .. })));
    }
}

#[test]
fn test_extension_update_changes_end_date() {
    let role = create_role("Developer", date(2020, 1, 1), None);
    let updated = role
        .update_with(
            OptionalValue::Unset,
            OptionalValue::Unset,
            set(Some(date(2022, 6, 30))),
        )
        .unwrap();

    assert_eq!(updated.title(), "Developer");
    assert_eq!(updated.start_date(), date(2020, 1, 1));
    assert_eq!(updated.end_date_if_any(), Some(date(2022, 6, 30)));
}

#[test]
fn test_extension_update_clearing_end_date() {
    let role = create_role("Developer", date(2020, 1, 1), Some(date(2021, 1, 1)));
    let cleared = role
        .update_with(OptionalValue::Unset, OptionalValue::Unset, set(None))
        .unwrap();
    assert_eq!(cleared.end_date_if_any(), None);

    let unchanged = cleared
        .update_with(OptionalValue::Unset, OptionalValue::Unset, set(None))
        .unwrap();
    assert!(Arc::ptr_eq(&unchanged, &cleared));
}

#[test]
fn test_extension_update_trims_title() {
    let role = create_role("Developer", date(2020, 1, 1), None);
    let updated = role
        .update_with(set("  Lead  ".to_string()), OptionalValue::Unset, OptionalValue::Unset)
        .unwrap();
    assert_eq!(updated.title(), "Lead");
}

#[test]
fn test_extension_update_rejected_by_constructor() {
    let role = create_role("Developer", date(2020, 1, 1), None);

    let blank = role.update_with(set("   ".to_string()), OptionalValue::Unset, OptionalValue::Unset);
    assert!(matches!(
        blank,
        Err(UpdateError::Construction(ConstructError::Rejected(_)))
    ));

    let backwards = role.update_with(
        OptionalValue::Unset,
        OptionalValue::Unset,
        set(Some(date(2019, 1, 1))),
    );
    assert!(matches!(
        backwards,
        Err(UpdateError::Construction(ConstructError::Rejected(_)))
    ));
}

#[test]
fn test_extension_declaring_type_in_cache_key() {
    let helper = UpdateWithHelper::new();
    let plan = helper
        .resolve_plan::<RoleDetails>(RoleDetailsExtensions::signature())
        .unwrap();

    assert!(plan.key().declaring().is::<RoleDetailsExtensions>());
    assert!(plan.key().target().is::<RoleDetails>());
    assert_eq!(plan.arity(), 3);
    assert!(plan.parameter_sources().iter().all(ParameterSource::is_intent));
}

#[test]
fn test_exact_matching_breaks_camel_case_mapping() {
    let helper = UpdateWithHelper::from_config(
        &ResolverConfig::new().with_name_matching(NameMatching::Exact),
    );
    let result = helper.resolve_plan::<RoleDetails>(RoleDetailsExtensions::signature());
    assert!(matches!(result, Err(ResolveError::UnmappableArgument { .. })));
}

#[test]
fn test_shared_cache_respects_each_helpers_matching() {
    let cache = Arc::new(PlanCache::new());
    let relaxed = UpdateWithHelper::builder()
        .cache(Arc::clone(&cache) as Arc<dyn PlanStore>)
        .build();
    let exact = UpdateWithHelper::builder()
        .cache(Arc::clone(&cache) as Arc<dyn PlanStore>)
        .config(&ResolverConfig::new().with_name_matching(NameMatching::Exact))
        .build();

    relaxed
        .resolve_plan::<RoleDetails>(RoleDetailsExtensions::signature())
        .unwrap();
    let result = exact.resolve_plan::<RoleDetails>(RoleDetailsExtensions::signature());
    assert!(matches!(result, Err(ResolveError::UnmappableArgument { .. })));

    let role = create_role("Developer", date(2020, 1, 1), None);
    let values = [
        OptionalValue::Set("Lead".to_string()).erase(),
        OptionalValue::<chrono::NaiveDate>::Unset.erase(),
        OptionalValue::<Option<chrono::NaiveDate>>::Unset.erase(),
    ];
    let updated = relaxed
        .update(&role, RoleDetailsExtensions::signature(), &values)
        .unwrap();
    assert_eq!(updated.title(), "Lead");
    assert!(exact
        .update(&role, RoleDetailsExtensions::signature(), &values)
        .is_err_and(|e| e.is_resolution()));
}

#[test]
fn test_config_from_json() {
    let config: ResolverConfig =
        serde_json::from_str(r#"{ "name_matching": "exact", "log_ambiguity": false }"#).unwrap();
    assert_eq!(config.name_matching, NameMatching::Exact);
    assert!(!config.log_ambiguity);
}

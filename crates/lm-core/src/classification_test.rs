use super::*;

fn derive(flags: &[(&str, bool)]) -> DerivedClasses {
    derive_classification(flags.iter().copied())
}

#[test]
fn test_associate_online_no_catch_all() {
    // ClassAssociate=1 + AssociateOnline=1 yields associate/[online] only;
    // the specific sub-type suppresses `other`.
    let derived = derive(&[
        ("ClassAssociate", true),
        ("AssociateOnline", true),
        ("GrownChile", false),
        ("TasteSalsa", false),
    ]);

    assert_eq!(derived.classifications, vec![Classification::Associate]);
    assert_eq!(derived.associate_types, vec![AssociateType::Online]);
}

#[test]
fn test_catch_all_other() {
    let derived = derive(&[("ClassAssociate", true)]);
    assert_eq!(derived.classifications, vec![Classification::Associate]);
    assert_eq!(derived.associate_types, vec![AssociateType::Other]);
}

#[test]
fn test_in_person_requires_three_grown_taste() {
    let base = [
        ("AssociateInPerson", true),
        ("GrownChile", true),
        ("GrownPecans", true),
    ];
    let derived = derive(&base);
    assert!(derived.has(Classification::Associate));
    // Only two grown/taste flags on, so in_person does not apply
    assert!(!derived.associate_types.contains(&AssociateType::InPerson));

    let mut with_third = base.to_vec();
    with_third.push(("TasteSalsa", true));
    let derived = derive(&with_third);
    assert!(derived.associate_types.contains(&AssociateType::InPerson));
}

#[test]
fn test_restaurant_requires_one_grown_taste() {
    let derived = derive(&[("AssociateRestaurant", true)]);
    assert!(!derived.associate_types.contains(&AssociateType::Restaurant));

    let derived = derive(&[("AssociateRestaurant", true), ("TasteWine", true)]);
    assert!(derived.associate_types.contains(&AssociateType::Restaurant));
}

#[test]
fn test_class_grown_counts_for_bucket_not_count() {
    // ClassGrown sets the grown bucket but does not feed grown_taste_count
    let derived = derive(&[("ClassGrown", true), ("AssociateRestaurant", true)]);
    assert!(derived.has(Classification::Grown));
    assert!(derived.has(Classification::Associate));
    assert!(!derived.associate_types.contains(&AssociateType::Restaurant));
}

#[test]
fn test_all_three_buckets() {
    let derived = derive(&[
        ("GrownChile", true),
        ("TasteSalsa", true),
        ("SalesTypeRetail", true),
    ]);
    assert!(derived.has(Classification::Grown));
    assert!(derived.has(Classification::Taste));
    assert!(derived.has(Classification::Associate));
}

#[test]
fn test_exports_flags_set_associate() {
    for flag in [
        "CurrentExportsMexico",
        "InterestExportsCanada",
        "InterestInternationalTrade",
    ] {
        let derived = derive(&[(flag, true)]);
        assert!(derived.has(Classification::Associate), "flag {flag}");
    }
}

#[test]
fn test_off_flags_do_nothing() {
    let derived = derive(&[("GrownChile", false), ("ClassAssociate", false)]);
    assert!(derived.classifications.is_empty());
    assert!(derived.associate_types.is_empty());
}

#[test]
fn test_single_flag_subtypes() {
    let derived = derive(&[
        ("ClassAssociate", true),
        ("AssociateTourism", true),
        ("AssociatePet", true),
    ]);
    assert_eq!(
        derived.associate_types,
        vec![AssociateType::Tourism, AssociateType::Pet]
    );
}

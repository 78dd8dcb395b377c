//! Property tests for the attribute URN round-trip law
//!
//! For every descriptor value the canonical string form must parse back to
//! an equal descriptor.

use libg3d::{Association, AttributeDescriptor, DataType, Error, urns};
use proptest::prelude::*;

fn association_strategy() -> impl Strategy<Value = Association> {
    prop::sample::select(vec![
        Association::All,
        Association::None,
        Association::Vertex,
        Association::Corner,
        Association::Edge,
        Association::Face,
        Association::Mesh,
        Association::Submesh,
        Association::Instance,
        Association::Material,
    ])
}

fn data_type_strategy() -> impl Strategy<Value = DataType> {
    prop::sample::select(vec![
        DataType::Int8,
        DataType::Int16,
        DataType::Int32,
        DataType::Int64,
        DataType::Float32,
        DataType::Float64,
    ])
}

proptest! {
    #[test]
    fn descriptor_round_trips_through_its_urn(
        association in association_strategy(),
        semantic in "[a-z][a-z0-9]{0,15}",
        index in any::<u32>(),
        data_type in data_type_strategy(),
        arity in any::<u32>(),
    ) {
        let descriptor = AttributeDescriptor::new(association, semantic, index, data_type, arity);
        let reparsed = AttributeDescriptor::parse(&descriptor.urn()).unwrap();
        prop_assert_eq!(&reparsed, &descriptor);
        prop_assert!(descriptor.validate().is_ok());
    }

    #[test]
    fn urn_with_extra_parts_is_rejected(
        semantic in "[a-z]{1,8}",
        extra in "[a-z]{1,8}",
    ) {
        let urn = format!("g3d:vertex:{semantic}:0:float32:3:{extra}");
        prop_assert!(
            matches!(
                AttributeDescriptor::parse(&urn),
                Err(Error::InvalidUrn { .. })
            ),
            "urn with extra parts should be rejected"
        );
    }
}

#[test]
fn test_well_known_urns_round_trip() {
    for urn in urns::ALL {
        let descriptor = AttributeDescriptor::parse(urn).unwrap();
        assert_eq!(descriptor.urn(), urn);
        descriptor.validate().unwrap();
    }
}

#[test]
fn test_well_known_urns_have_expected_shapes() {
    let positions = AttributeDescriptor::parse(urns::POSITIONS).unwrap();
    assert_eq!(positions.association, Association::Vertex);
    assert_eq!(positions.arity, 3);
    assert_eq!(positions.element_size(), 12);

    let transforms = AttributeDescriptor::parse(urns::INSTANCE_TRANSFORMS).unwrap();
    assert_eq!(transforms.association, Association::Instance);
    assert_eq!(transforms.arity, 16);
    assert_eq!(transforms.element_size(), 64);
}

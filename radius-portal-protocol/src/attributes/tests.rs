use super::*;

#[test]
fn serialize_attribute() {
    let attribute =
        Attribute::new(AttributeType::FilterId, b"StaffPolicy").expect("value should fit");

    let mut buffer = [0xffu8; 16];
    let written = attribute
        .serialize_into_buffer(&mut buffer)
        .expect("buffer should be large enough");

    assert_eq!(written, 13);
    assert_eq!(
        buffer[..written],
        [
            11, // type: Filter-Id
            13, // length, including type & length fields
            0x53, 0x74, 0x61, 0x66, 0x66, 0x50, 0x6f, 0x6c, 0x69, 0x63, 0x79 // StaffPolicy
        ]
    );
}

#[test]
fn attribute_value_too_long() {
    let value = [0x2a; 254];
    assert!(
        Attribute::new(AttributeType::ReplyMessage, &value).is_none(),
        "254 bytes shouldn't fit in an attribute"
    );

    let value = [0x2a; 253];
    assert!(Attribute::new(AttributeType::ReplyMessage, &value).is_some());
}

#[test]
fn serialize_attribute_not_enough_space() {
    let attribute = Attribute::new(AttributeType::UserName, b"alice").expect("value should fit");

    let mut buffer = [0u8; 6];
    assert!(attribute.serialize_into_buffer(&mut buffer).is_err());
}

#[test]
fn walk_attribute_section() {
    let raw: &[u8] = &[
        11, 7, 0x47, 0x75, 0x65, 0x73, 0x74, // Filter-Id: Guest
        5, 6, 0, 0, 0, 42, // NAS-Port: 42
        4, 6, 10, 0, 0, 1, // NAS-IP-Address: 10.0.0.1
        200, 2, // unknown type with empty value
    ];

    let attributes = Attributes::try_from(raw).expect("framing should be valid");
    let collected: [Attribute<'_>; 4] = {
        let mut iter = attributes.iter();
        core::array::from_fn(|_| iter.next().expect("there should be four attributes"))
    };

    assert_eq!(collected[0].attribute_type(), Some(AttributeType::FilterId));
    assert_eq!(collected[0].as_text(), Some("Guest"));

    assert_eq!(collected[1].attribute_type(), Some(AttributeType::NasPort));
    assert_eq!(collected[1].as_integer(), Some(42));

    assert_eq!(collected[2].as_address(), Some(Ipv4Addr::new(10, 0, 0, 1)));

    assert_eq!(collected[3].attribute_type(), None);
    assert_eq!(collected[3].type_code(), 200);
    assert!(collected[3].value().is_empty());

    assert_eq!(attributes.iter().count(), 4);
}

#[test]
fn attribute_length_past_end_of_buffer() {
    let raw: &[u8] = &[
        11, 7, 0x47, 0x75, 0x65, 0x73, 0x74, // Filter-Id: Guest
        18, 10, 0x68, 0x69, // Reply-Message claiming 10 bytes, only 4 present
    ];

    assert_eq!(
        Attributes::try_from(raw),
        Err(DeserializeError::MalformedPacket)
    );
}

#[test]
fn attribute_length_too_small() {
    // a length of 1 can't even cover the type & length fields
    let raw: &[u8] = &[11, 1, 0x41];

    assert_eq!(
        Attributes::try_from(raw),
        Err(DeserializeError::MalformedPacket)
    );
}

#[test]
fn truncated_attribute_header() {
    let raw: &[u8] = &[5, 6, 0, 0, 0, 1, 11];

    assert_eq!(
        Attributes::try_from(raw),
        Err(DeserializeError::MalformedPacket)
    );
}

#[test]
fn last_instance_wins() {
    let raw: &[u8] = &[
        11, 7, 0x47, 0x75, 0x65, 0x73, 0x74, // Filter-Id: Guest
        11, 7, 0x53, 0x74, 0x61, 0x66, 0x66, // Filter-Id: Staff
    ];

    let attributes = Attributes::try_from(raw).expect("framing should be valid");
    let filter_id = attributes
        .last_of(AttributeType::FilterId)
        .expect("Filter-Id should be present");

    assert_eq!(filter_id.as_text(), Some("Staff"));
    assert!(attributes.last_of(AttributeType::ReplyMessage).is_none());
}

#[test]
fn serialize_attribute_list() {
    let list = [
        Attribute::new(AttributeType::FilterId, b"A").expect("value should fit"),
        Attribute::new(AttributeType::SessionTimeout, &[0, 0, 0x0e, 0x10])
            .expect("value should fit"),
    ];

    let mut buffer = [0u8; 32];
    let attributes = Attributes::serialize_into(&list, &mut buffer).expect("buffer should fit");

    assert_eq!(
        attributes.as_bytes(),
        [
            11, 3, 0x41, // Filter-Id: A
            27, 6, 0, 0, 0x0e, 0x10 // Session-Timeout: 3600
        ]
    );
}

#[cfg(feature = "std")]
#[test]
fn owned_map_decodes_by_kind() {
    let raw: &[u8] = &[
        11, 7, 0x47, 0x75, 0x65, 0x73, 0x74, // Filter-Id: Guest
        27, 6, 0, 0, 0x0e, 0x10, // Session-Timeout: 3600
        8, 6, 192, 168, 7, 9, // Framed-IP-Address
        27, 3, 0xff, // Session-Timeout again, with a bad width
        11, 4, 0x4e, 0x65, // Filter-Id: Ne (replaces Guest)
        99, 4, 0xde, 0xad, // unknown type
    ];

    let attributes = Attributes::try_from(raw).expect("framing should be valid");
    let map = AttributeMap::from(attributes);

    assert_eq!(map.len(), 4);
    assert_eq!(
        map.get_type(AttributeType::FilterId),
        Some(&AttributeValue::Text("Ne".to_owned()))
    );
    assert_eq!(
        map.get("Framed-IP-Address"),
        Some(&AttributeValue::Address(Ipv4Addr::new(192, 168, 7, 9)))
    );

    // the badly sized instance came last, so it wins but falls back to raw octets
    assert_eq!(
        map.get_type(AttributeType::SessionTimeout),
        Some(&AttributeValue::Octets(vec![0xff]))
    );
    assert_eq!(
        map.get("Attr-99"),
        Some(&AttributeValue::Octets(vec![0xde, 0xad]))
    );
}

#[cfg(feature = "std")]
#[test]
fn non_utf8_text_falls_back_to_octets() {
    let raw: &[u8] = &[11, 4, 0xc3, 0x28];
    let attributes = Attributes::try_from(raw).expect("framing should be valid");

    let map = AttributeMap::from(attributes);
    let value = map
        .get_type(AttributeType::FilterId)
        .expect("Filter-Id should be present");

    assert_eq!(value.as_text(), None);
    assert_eq!(value.to_string(), "0xc328");
}

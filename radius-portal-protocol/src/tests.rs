use super::*;

#[test]
fn split_header() {
    let packet = [
        0x02, 0x07, 0x00, 0x18, // Access-Accept, identifier 7, length 24
        1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, // authenticator
        27, 4, 0x0e, 0x10, // attribute section
    ];

    let header = RawHeader::split(&packet).expect("header should be valid");

    assert_eq!(header.code, Code::AccessAccept as u8);
    assert_eq!(header.identifier, 7);
    assert_eq!(
        header.authenticator,
        Authenticator::from([1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16])
    );
    assert_eq!(header.prefix, [0x02, 0x07, 0x00, 0x18]);
    assert_eq!(header.attributes, [27, 4, 0x0e, 0x10]);
}

#[test]
fn split_header_length_above_maximum() {
    let mut packet = [0u8; MAX_PACKET_SIZE + 1];
    packet[0] = Code::AccessAccept as u8;
    packet[2..4].copy_from_slice(&4097u16.to_be_bytes());

    assert!(matches!(
        RawHeader::split(&packet),
        Err(DeserializeError::MalformedPacket)
    ));
}

#[test]
fn write_header() {
    let mut buffer = [0u8; 4];
    write_header_prefix(&mut buffer, Code::AccessRequest, 0xab, 300);

    assert_eq!(buffer, [0x01, 0xab, 0x01, 0x2c]);
}

#[test]
fn code_from_byte() {
    assert!(matches!(Code::try_from(11), Ok(Code::AccessChallenge)));
    assert!(Code::try_from(4).is_err());
}

#[cfg(feature = "std")]
#[test]
fn authenticator_debug_is_hex() {
    let authenticator = Authenticator::from([
        0x0f, 0x40, 0x3f, 0x94, 0x73, 0x97, 0x80, 0x57, 0xbd, 0x83, 0xd5, 0xcb, 0x98, 0xf4, 0x22,
        0x7a,
    ]);

    assert_eq!(
        format!("{authenticator:?}"),
        "0f403f9473978057bd83d5cb98f4227a"
    );
}

#[cfg(feature = "std")]
#[test]
fn error_messages() {
    assert_eq!(
        DeserializeError::IdentifierMismatch {
            expected: 1,
            received: 2
        }
        .to_string(),
        "Packet identifier 2 does not match outstanding request 1"
    );
    assert_eq!(
        DeserializeError::MissingAttribute(AttributeType::UserPassword).to_string(),
        "Missing required attribute User-Password"
    );
}

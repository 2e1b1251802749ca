/// Append `scalar` as a 2, 3 or 4 byte UTF-8 sequence and return the number
/// of bytes written.
///
/// ASCII never reaches this path, so even small scalars take two bytes.
/// Values are not validated.
pub fn write_utf8(out: &mut Vec<u8>, scalar: i32) -> usize {
    if scalar < 1 << 11 {
        out.push((0xC0 + (scalar >> 6)) as u8);
        out.push((0x80 + (scalar & 63)) as u8);
        2
    } else if scalar < 1 << 16 {
        out.push((0xE0 + (scalar >> 12)) as u8);
        out.push((0x80 + ((scalar >> 6) & 63)) as u8);
        out.push((0x80 + (scalar & 63)) as u8);
        3
    } else {
        out.push((0xF0 + (scalar >> 18)) as u8);
        out.push((0x80 + ((scalar >> 12) & 63)) as u8);
        out.push((0x80 + ((scalar >> 6) & 63)) as u8);
        out.push((0x80 + (scalar & 63)) as u8);
        4
    }
}

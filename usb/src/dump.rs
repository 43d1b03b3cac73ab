use std::fmt::Write;

const BYTES_PER_LINE: usize = 16;
const BYTES_PER_GROUP: usize = 4;

/// Formats `data` as tab-indented hex, sixteen bytes to a line in groups of four.
pub fn hex_dump(data: &[u8]) -> String {
    let mut output = String::with_capacity(data.len() * 3);

    for (line_index, line) in data.chunks(BYTES_PER_LINE).enumerate() {
        if line_index > 0 {
            output.push('\n');
        }
        output.push('\t');

        for (group_index, group) in line.chunks(BYTES_PER_GROUP).enumerate() {
            if group_index > 0 {
                output.push(' ');
            }
            for byte in group {
                let _ = write!(output, "{:02x}", byte);
            }
        }
    }
    output
}

use honggfuzz::fuzz;
use unishox_pgm::{decompress, BufferTable};

fn main() {
    loop {
        fuzz!(|data: &[u8]| {
            let Ok(table) = BufferTable::from_payloads(data.chunks(255)) else {
                return;
            };
            for i in 0..table.len() {
                let _ = decompress(&table, i);
            }
        });
    }
}

use crate::decoder::function_mask::FunctionMask;
use crate::models::BitMatrix;

/// Data module coordinates (x, y) in placement order.
///
/// Column pairs are walked right to left, alternating upward and
/// downward, skipping the vertical timing column. Within a pair the
/// right module comes first.
pub fn data_module_order(func: &FunctionMask) -> Vec<(usize, usize)> {
    let size = func.size();
    let mut order = Vec::with_capacity(func.data_modules_count());
    let mut upward = true;
    let mut right = size as isize - 1;

    while right >= 1 {
        if right == 6 {
            right = 5;
        }
        for step in 0..size {
            let y = if upward { size - 1 - step } else { step };
            for x in [right as usize, right as usize - 1] {
                if !func.is_function(x, y) {
                    order.push((x, y));
                }
            }
        }
        upward = !upward;
        right -= 2;
    }

    order
}

/// Read codewords (MSB first) from an unmasked symbol. Trailing remainder bits are dropped.
pub fn extract_codewords(matrix: &BitMatrix, func: &FunctionMask) -> Vec<u8> {
    let order = data_module_order(func);
    order
        .chunks_exact(8)
        .map(|chunk| {
            chunk
                .iter()
                .fold(0u8, |byte, &(x, y)| (byte << 1) | matrix.get(x, y) as u8)
        })
        .collect()
}

/// Write codewords (MSB first) into the data modules; remainder bits stay light
pub fn place_codewords(matrix: &mut BitMatrix, func: &FunctionMask, codewords: &[u8]) {
    let order = data_module_order(func);
    for (i, &(x, y)) in order.iter().enumerate() {
        let Some(&byte) = codewords.get(i / 8) else {
            break;
        };
        matrix.set(x, y, (byte >> (7 - i % 8)) & 1 == 1);
    }
}

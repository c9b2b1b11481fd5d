//! Reed-Solomon coding over GF(256) with primitive polynomial 0x11D
//!
//! Generator polynomials have roots alpha^0 .. alpha^(n-1). Codewords are
//! stored highest-degree coefficient first.

use std::sync::OnceLock;

/// GF(256) arithmetic via log/antilog tables
pub struct Gf256;

static LOG_TABLE: [u8; 256] = [
    0, 0, 1, 25, 2, 50, 26, 198, 3, 223, 51, 238, 27, 104, 199, 75, 4, 100, 224, 14, 52, 141, 239,
    129, 28, 193, 105, 248, 200, 8, 76, 113, 5, 138, 101, 47, 225, 36, 15, 33, 53, 147, 142, 218,
    240, 18, 130, 69, 29, 181, 194, 125, 106, 39, 249, 185, 201, 154, 9, 120, 77, 228, 114, 166, 6,
    191, 139, 98, 102, 221, 48, 253, 226, 152, 37, 179, 16, 145, 34, 136, 54, 208, 148, 206, 143,
    150, 219, 189, 241, 210, 19, 92, 131, 56, 70, 64, 30, 66, 182, 163, 195, 72, 126, 110, 107, 58,
    40, 84, 250, 133, 186, 61, 202, 94, 155, 159, 10, 21, 121, 43, 78, 212, 229, 172, 115, 243,
    167, 87, 7, 112, 192, 247, 140, 128, 99, 13, 103, 74, 222, 237, 49, 197, 254, 24, 227, 165,
    153, 119, 38, 184, 180, 124, 17, 68, 146, 217, 35, 32, 137, 46, 55, 63, 209, 91, 149, 188, 207,
    205, 144, 135, 151, 178, 220, 252, 190, 97, 242, 86, 211, 171, 20, 42, 93, 158, 132, 60, 57,
    83, 71, 109, 65, 162, 31, 45, 67, 216, 183, 123, 164, 118, 196, 23, 73, 236, 127, 12, 111, 246,
    108, 161, 59, 82, 41, 157, 85, 170, 251, 96, 134, 177, 187, 204, 62, 90, 203, 89, 95, 176, 156,
    169, 160, 81, 11, 245, 22, 235, 122, 117, 44, 215, 79, 174, 213, 233, 230, 231, 173, 232, 116,
    214, 244, 234, 168, 80, 88, 175,
];

static EXP_TABLE: [u8; 256] = [
    1, 2, 4, 8, 16, 32, 64, 128, 29, 58, 116, 232, 205, 135, 19, 38, 76, 152, 45, 90, 180, 117,
    234, 201, 143, 3, 6, 12, 24, 48, 96, 192, 157, 39, 78, 156, 37, 74, 148, 53, 106, 212, 181,
    119, 238, 193, 159, 35, 70, 140, 5, 10, 20, 40, 80, 160, 93, 186, 105, 210, 185, 111, 222, 161,
    95, 190, 97, 194, 153, 47, 94, 188, 101, 202, 137, 15, 30, 60, 120, 240, 253, 231, 211, 187,
    107, 214, 177, 127, 254, 225, 223, 163, 91, 182, 113, 226, 217, 175, 67, 134, 17, 34, 68, 136,
    13, 26, 52, 104, 208, 189, 103, 206, 129, 31, 62, 124, 248, 237, 199, 147, 59, 118, 236, 197,
    151, 51, 102, 204, 133, 23, 46, 92, 184, 109, 218, 169, 79, 158, 33, 66, 132, 21, 42, 84, 168,
    77, 154, 41, 82, 164, 85, 170, 73, 146, 57, 114, 228, 213, 183, 115, 230, 209, 191, 99, 198,
    145, 63, 126, 252, 229, 215, 179, 123, 246, 241, 255, 227, 219, 171, 75, 150, 49, 98, 196, 149,
    55, 110, 220, 165, 87, 174, 65, 130, 25, 50, 100, 200, 141, 7, 14, 28, 56, 112, 224, 221, 167,
    83, 166, 81, 162, 89, 178, 121, 242, 249, 239, 195, 155, 43, 86, 172, 69, 138, 9, 18, 36, 72,
    144, 61, 122, 244, 245, 247, 243, 251, 235, 203, 139, 11, 22, 44, 88, 176, 125, 250, 233, 207,
    131, 27, 54, 108, 216, 173, 71, 142, 1,
];

impl Gf256 {
    /// Field product
    #[inline]
    pub fn mul(a: u8, b: u8) -> u8 {
        if a == 0 || b == 0 {
            return 0;
        }
        let log_a = LOG_TABLE[a as usize] as usize;
        let log_b = LOG_TABLE[b as usize] as usize;
        EXP_TABLE[(log_a + log_b) % 255]
    }

    /// `a / b`; callers guarantee `b != 0`
    #[inline]
    pub fn div(a: u8, b: u8) -> u8 {
        debug_assert!(b != 0, "division by zero in GF(256)");
        if a == 0 || b == 0 {
            return 0;
        }
        let log_a = LOG_TABLE[a as usize] as usize;
        let log_b = LOG_TABLE[b as usize] as usize;
        EXP_TABLE[(log_a + 255 - log_b) % 255]
    }

    /// alpha^n
    #[inline]
    pub fn exp(n: usize) -> u8 {
        EXP_TABLE[n % 255]
    }

    /// `a` to the power `n`
    pub fn pow_usize(a: u8, n: usize) -> u8 {
        if a == 0 {
            return if n == 0 { 1 } else { 0 };
        }
        let log_a = LOG_TABLE[a as usize] as usize;
        EXP_TABLE[(log_a * (n % 255)) % 255]
    }

    /// Multiplicative inverse; `a != 0`
    #[inline]
    pub fn inv(a: u8) -> u8 {
        Self::div(1, a)
    }
}

/// Evaluate a polynomial given lowest-degree coefficient first
fn eval_ascending(poly: &[u8], x: u8) -> u8 {
    poly.iter()
        .rev()
        .fold(0u8, |acc, &c| Gf256::mul(acc, x) ^ c)
}

/// Highest supported parity length for one block
pub const MAX_ECC_CODEWORDS: usize = 68;

static GENERATORS: OnceLock<Vec<Vec<u8>>> = OnceLock::new();

/// Generator polynomial of degree `degree`, non-leading coefficients,
/// highest degree first (the monic leading 1 is implied)
fn generator(degree: usize) -> &'static [u8] {
    let all = GENERATORS.get_or_init(|| {
        let mut out = Vec::with_capacity(MAX_ECC_CODEWORDS + 1);
        for n in 0..=MAX_ECC_CODEWORDS {
            // ascending coefficients of prod (x + alpha^i)
            let mut poly = vec![1u8];
            for i in 0..n {
                let root = Gf256::exp(i);
                let mut next = vec![0u8; poly.len() + 1];
                for (j, &c) in poly.iter().enumerate() {
                    next[j] ^= Gf256::mul(c, root);
                    next[j + 1] ^= c;
                }
                poly = next;
            }
            let mut coeffs: Vec<u8> = poly[..n].to_vec();
            coeffs.reverse();
            out.push(coeffs);
        }
        out
    });
    &all[degree.min(MAX_ECC_CODEWORDS)]
}

/// Reed-Solomon parity generator
pub struct ReedSolomonEncoder {
    num_ecc_codewords: usize,
}

impl ReedSolomonEncoder {
    /// Encoder producing `num_ecc_codewords` parity bytes per block
    pub fn new(num_ecc_codewords: usize) -> Self {
        Self {
            num_ecc_codewords: num_ecc_codewords.min(MAX_ECC_CODEWORDS),
        }
    }

    /// Parity codewords for `data` (remainder of data * x^n by the generator)
    pub fn parity(&self, data: &[u8]) -> Vec<u8> {
        let n = self.num_ecc_codewords;
        if n == 0 {
            return Vec::new();
        }
        let gen_poly = generator(n);
        let mut remainder = vec![0u8; n];
        for &d in data {
            let factor = d ^ remainder[0];
            remainder.rotate_left(1);
            remainder[n - 1] = 0;
            if factor != 0 {
                for (r, &g) in remainder.iter_mut().zip(gen_poly) {
                    *r ^= Gf256::mul(g, factor);
                }
            }
        }
        remainder
    }

    /// `data` followed by its parity
    pub fn encode(&self, data: &[u8]) -> Vec<u8> {
        let mut out = data.to_vec();
        out.extend(self.parity(data));
        out
    }
}

/// Reed-Solomon decoder for QR codes
pub struct ReedSolomonDecoder {
    num_ecc_codewords: usize,
}

impl ReedSolomonDecoder {
    /// Decoder for blocks carrying `num_ecc_codewords` parity bytes
    pub fn new(num_ecc_codewords: usize) -> Self {
        Self { num_ecc_codewords }
    }

    /// Correct `received` in place. Returns the number of corrected codewords.
    ///
    /// Fails when more than `num_ecc / 2` codewords are wrong.
    pub fn decode(&self, received: &mut [u8]) -> Result<usize, &'static str> {
        if received.len() > 255 || received.len() <= self.num_ecc_codewords {
            return Err("Block length out of range");
        }
        let syndrome = self.calculate_syndrome(received);
        if syndrome.iter().all(|&s| s == 0) {
            return Ok(0);
        }

        let (sigma, degree) = self.find_error_locator(&syndrome);
        if degree == 0 || 2 * degree > self.num_ecc_codewords {
            return Err("Too many errors");
        }

        let error_positions = self.find_error_positions(&sigma, degree, received.len())?;
        let error_values =
            self.find_error_values(&sigma, &syndrome, &error_positions, received.len())?;

        for (&pos, &value) in error_positions.iter().zip(&error_values) {
            received[pos] ^= value;
        }

        if self.calculate_syndrome(received).iter().any(|&s| s != 0) {
            return Err("Uncorrectable error");
        }

        Ok(error_positions.len())
    }

    fn calculate_syndrome(&self, received: &[u8]) -> Vec<u8> {
        // S_i = r(alpha^i), Horner over the highest-degree-first codeword
        (0..self.num_ecc_codewords)
            .map(|i| {
                let x = Gf256::exp(i);
                received
                    .iter()
                    .fold(0u8, |acc, &c| Gf256::mul(acc, x) ^ c)
            })
            .collect()
    }

    /// Berlekamp-Massey; returns the locator (ascending) and its degree
    fn find_error_locator(&self, syndrome: &[u8]) -> (Vec<u8>, usize) {
        let n = syndrome.len();
        let mut sigma = vec![0u8; n + 1];
        sigma[0] = 1;
        let mut b = sigma.clone();
        let mut delta_b: u8 = 1;
        let mut l = 0usize;
        let mut m = 1usize;

        for i in 0..n {
            let mut delta = syndrome[i];
            for j in 1..=l.min(i) {
                delta ^= Gf256::mul(sigma[j], syndrome[i - j]);
            }

            if delta == 0 {
                m += 1;
                continue;
            }

            let d = Gf256::div(delta, delta_b);
            let previous = sigma.clone();
            // sigma -= d * x^m * b
            for j in 0..=n {
                if j + m > n {
                    break;
                }
                sigma[j + m] ^= Gf256::mul(d, b[j]);
            }

            if 2 * l <= i {
                l = i + 1 - l;
                b = previous;
                delta_b = delta;
                m = 1;
            } else {
                m += 1;
            }
        }

        sigma.truncate(l + 1);
        let degree = sigma.iter().rposition(|&c| c != 0).unwrap_or(0);
        if degree != l {
            // The locator degenerated; report an impossible degree.
            return (sigma, usize::MAX / 4);
        }
        (sigma, l)
    }

    fn find_error_positions(
        &self,
        sigma: &[u8],
        degree: usize,
        n: usize,
    ) -> Result<Vec<usize>, &'static str> {
        // Chien search: position i has locator X = alpha^(n-1-i); sigma(X^-1) = 0
        let mut positions = Vec::with_capacity(degree);
        for i in 0..n {
            let x_inv = Gf256::exp(255 - (n - 1 - i) % 255);
            if eval_ascending(sigma, x_inv) == 0 {
                positions.push(i);
            }
        }

        if positions.len() != degree {
            return Err("Wrong number of error positions found");
        }
        Ok(positions)
    }

    fn find_error_values(
        &self,
        sigma: &[u8],
        syndrome: &[u8],
        error_positions: &[usize],
        n: usize,
    ) -> Result<Vec<u8>, &'static str> {
        // Forney: omega = S(x) * sigma(x) mod x^(2t)
        let mut omega = vec![0u8; syndrome.len()];
        for (i, slot) in omega.iter_mut().enumerate() {
            for j in 0..=i.min(sigma.len() - 1) {
                *slot ^= Gf256::mul(sigma[j], syndrome[i - j]);
            }
        }

        // Formal derivative: only odd-degree terms survive in characteristic 2
        let sigma_prime: Vec<u8> = sigma
            .iter()
            .enumerate()
            .skip(1)
            .map(|(i, &c)| if i % 2 == 1 { c } else { 0 })
            .collect();

        let mut values = Vec::with_capacity(error_positions.len());
        for &pos in error_positions {
            let exponent = (n - 1 - pos) % 255;
            let x_k = Gf256::exp(exponent);
            let x_inv = Gf256::inv(x_k);

            let denominator = eval_ascending(&sigma_prime, x_inv);
            if denominator == 0 {
                return Err("Sigma derivative is zero");
            }
            let numerator = eval_ascending(&omega, x_inv);
            values.push(Gf256::mul(x_k, Gf256::div(numerator, denominator)));
        }
        Ok(values)
    }
}

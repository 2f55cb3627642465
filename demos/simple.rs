//! A simple example showing the use of a Bloom filter.
use fnvbloom::BloomFilter;

fn main() -> Result<(), fnvbloom::Error> {
    let mut bf = BloomFilter::new(32, 2)?;

    bf.add("x");

    bf.test("x"); // true
    bf.test("y"); // false

    bf.size(); // ~0.51

    // Store the hash count alongside the dump, it is not part of it.
    let json = bf.to_json()?; // "[8]"
    let copy = BloomFilter::from_json(&json, bf.hashes())?;
    copy.test("x"); // true

    Ok(())
}

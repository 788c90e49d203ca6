//! Image I/O
//!
//! Single channel floating point images: depth buffers written by the host's
//! geometry passes come in as OpenEXR or PFM, disparity maps go out as NPY,
//! PFM, OpenEXR or an 8-bit PNG preview.

use crate::error::*;
use crate::fileutil::extension;
use crate::numeric::*;
use byteorder::{BigEndian, LittleEndian, ReadBytesExt, WriteBytesExt};
use exr::prelude::{
    read_first_flat_layer_from_file, AnyChannel, Encoding, FlatSamples, Image, ImageAttributes,
    IntegerBounds, Layer, LayerAttributes, SpecificChannels, Vec2, WritableImage,
};
use image::{ImageBuffer, ImageFormat, Luma};
use regex::Regex;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::sync::OnceLock;

/// Stores single channel floating point image data in row-major order,
/// top row first.
#[derive(Clone, Debug, PartialEq)]
pub struct FloatImage {
    /// The pixels.
    pub pixels: Vec<Float>,

    /// Image width.
    pub width: usize,

    /// Image height.
    pub height: usize,
}

impl FloatImage {
    /// Creates a new `FloatImage` from pixel data.
    ///
    /// * `pixels` - Pixel data, `width * height` values.
    /// * `width`  - Width of image.
    /// * `height` - Height of image.
    pub fn new(pixels: Vec<Float>, width: usize, height: usize) -> Result<Self> {
        if width.checked_mul(height) != Some(pixels.len()) {
            return Err(Error::ShapeMismatch {
                width,
                height,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            pixels,
            width,
            height,
        })
    }

    /// Returns the pixel at (x, y).
    ///
    /// * `x` - Column.
    /// * `y` - Row.
    pub fn get(&self, x: usize, y: usize) -> Float {
        assert!(x < self.width && y < self.height, "pixel out of bounds");
        self.pixels[y * self.width + x]
    }

    /// Returns the rows of the image, top first.
    pub fn rows(&self) -> impl Iterator<Item = &[Float]> {
        self.pixels.chunks(self.width.max(1))
    }
}

/// Read a single channel floating point image.
///
/// * `path` - Input file path.
pub fn read_float_image<P: AsRef<Path>>(path: P) -> Result<FloatImage> {
    let path = path.as_ref();
    match extension(path).as_deref() {
        Some(".exr") => read_exr(path),
        Some(".pfm") => read_pfm(path),
        Some(".npy") => read_npy(path),
        _ => Err(Error::UnsupportedFormat(path.to_path_buf())),
    }
}

/// Write a single channel floating point image, choosing the format from the
/// file extension.
///
/// * `path`  - Output file path.
/// * `image` - The image.
pub fn write_float_image<P: AsRef<Path>>(path: P, image: &FloatImage) -> Result<()> {
    let path = path.as_ref();
    match extension(path).as_deref() {
        Some(".npy") => write_npy(path, image),
        Some(".pfm") => write_pfm(path, image),
        Some(".exr") => write_exr(path, image),
        Some(".png") => write_png(path, image),
        _ => Err(Error::UnsupportedFormat(path.to_path_buf())),
    }
}

/// Channel names that carry depth, in order of preference. Names are
/// compared after stripping any `layer.` prefix.
const DEPTH_CHANNELS: [&str; 4] = ["Z", "depth", "R", "Y"];

/// Read the depth channel from the first flat layer of an OpenEXR file. Falls
/// back to the first channel when none of the usual names are present.
///
/// * `path` - Input file path.
fn read_exr(path: &Path) -> Result<FloatImage> {
    let image = read_first_flat_layer_from_file(path).map_err(|e| Error::image(path, e))?;
    let layer = image.layer_data;
    let width = layer.size.width();
    let height = layer.size.height();

    let channels = &layer.channel_data.list;
    let short_name = |c: &AnyChannel<FlatSamples>| {
        let name = c.name.to_string();
        name.rsplit('.').next().unwrap_or_default().to_string()
    };
    let channel = DEPTH_CHANNELS
        .iter()
        .find_map(|wanted| channels.iter().find(|c| short_name(c) == *wanted))
        .or_else(|| channels.first())
        .ok_or_else(|| Error::image(path, "no channels"))?;

    let pixels: Vec<Float> = match &channel.sample_data {
        FlatSamples::F16(v) => v.iter().map(|h| h.to_f32()).collect(),
        FlatSamples::F32(v) => v.clone(),
        FlatSamples::U32(v) => v.iter().map(|&u| u as Float).collect(),
    };

    info!(
        "Read EXR image {} channel '{}' ({width} x {height})",
        path.display(),
        channel.name
    );
    FloatImage::new(pixels, width, height)
}

/// Writes the image in OpenEXR format. The value is replicated into R, G and
/// B so that tools reading the first channel see the data.
///
/// * `path`  - Output file path.
/// * `image` - The image.
fn write_exr(path: &Path, image: &FloatImage) -> Result<()> {
    info!(
        "Writing image {} with resolution {}x{}",
        path.display(),
        image.width,
        image.height
    );

    let size = Vec2(image.width, image.height);
    let layer = Layer::new(
        size,
        LayerAttributes::named("disparity"),
        Encoding::SMALL_LOSSLESS,
        SpecificChannels::rgb(|pos: Vec2<usize>| {
            let v = image.pixels[pos.1 * image.width + pos.0];
            (v, v, v)
        }),
    );

    let attributes = ImageAttributes::new(IntegerBounds::from_dimensions(size));
    Image::empty(attributes)
        .with_layer(layer)
        .write()
        .to_file(path)
        .map_err(|e| Error::image(path, e))
}

/// Returns true if the character is a space, newline or tab.
///
/// * `c` - The character to check.
#[inline(always)]
fn is_white_space(c: char) -> bool {
    c == ' ' || c == '\n' || c == '\t' || c == '\r'
}

/// Returns the number of pixels of a raster read from a file header after
/// checking that `channels` 4-byte samples per pixel fit in the file.
///
/// * `path`      - Path used in error messages.
/// * `width`     - Width from the header.
/// * `height`    - Height from the header.
/// * `channels`  - Samples per pixel.
/// * `file_size` - Size of the whole file in bytes.
fn raster_len(
    path: &Path,
    width: usize,
    height: usize,
    channels: usize,
    file_size: u64,
) -> Result<usize> {
    let len = width
        .checked_mul(height)
        .ok_or_else(|| Error::image(path, format!("{width}x{height} image is too large")))?;
    let bytes = len
        .checked_mul(channels * 4)
        .and_then(|n| u64::try_from(n).ok())
        .filter(|&n| n <= file_size)
        .ok_or_else(|| {
            Error::image(
                path,
                format!("{width}x{height} raster does not fit in {file_size} bytes"),
            )
        })?;
    debug!("{} raster bytes in {}", bytes, path.display());
    Ok(len)
}

// Reads a "word" from the file;  i.e. it keeps reading until whitespace is reached or maximum length is reached.
// Returns the string read *not* including the whitespace if successful.
//
// * `reader` - Source to read.
// * `len`    - Maximum number of bytes to read.
// * `path`   - Path used in error messages.
fn read_pfm_word<R: Read>(reader: &mut R, len: usize, path: &Path) -> Result<String> {
    let mut s = String::new();

    let mut c = reader.read_u8().map_err(|e| Error::io(path, e))?;
    while !is_white_space(c as char) {
        if s.len() >= len {
            return Err(Error::image(path, "PFM header word too long"));
        }
        s.push(c as char);
        c = reader.read_u8().map_err(|e| Error::io(path, e))?;
    }

    Ok(s)
}

/// Read a PFM (Portable FloatMap) file. For 3 channel files only the red
/// channel is kept.
///
/// * `path` - Input file path.
fn read_pfm(path: &Path) -> Result<FloatImage> {
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    let file_size = file.metadata().map_err(|e| Error::io(path, e))?.len();
    let mut reader = BufReader::new(file);

    // Read either "Pf" or "PF".
    let n_channels = match read_pfm_word(&mut reader, 2, path)?.as_str() {
        "Pf" => 1,
        "PF" => 3,
        s => return Err(Error::image(path, format!("invalid PFM type '{s}'"))),
    };

    let width = read_pfm_word(&mut reader, 80, path)?
        .parse::<usize>()
        .map_err(|e| Error::image(path, format!("PFM width: {e}")))?;
    let height = read_pfm_word(&mut reader, 80, path)?
        .parse::<usize>()
        .map_err(|e| Error::image(path, format!("PFM height: {e}")))?;
    let scale = read_pfm_word(&mut reader, 80, path)?
        .parse::<f32>()
        .map_err(|e| Error::image(path, format!("PFM scale: {e}")))?;

    // Negative scale means little endian.
    let file_little_endian = scale < 0.0;

    // Rows are stored bottom to top.
    let mut pixels = vec![0.0; raster_len(path, width, height, n_channels, file_size)?];
    for y in (0..height).rev() {
        for x in 0..width {
            for c in 0..n_channels {
                let f = if file_little_endian {
                    reader.read_f32::<LittleEndian>()
                } else {
                    reader.read_f32::<BigEndian>()
                }
                .map_err(|e| Error::io(path, e))?;
                if c == 0 {
                    pixels[y * width + x] = f;
                }
            }
        }
    }

    info!(
        "Read PFM image {} ({width} x {height} x {n_channels})",
        path.display()
    );
    FloatImage::new(pixels, width, height)
}

/// Writes the image as a single channel little endian PFM file.
///
/// * `path`  - Output file path.
/// * `image` - The image.
fn write_pfm(path: &Path, image: &FloatImage) -> Result<()> {
    info!(
        "Writing image {} with resolution {}x{}",
        path.display(),
        image.width,
        image.height
    );

    let file = File::create(path).map_err(|e| Error::io(path, e))?;
    let mut writer = BufWriter::new(file);

    write!(writer, "Pf\n{} {}\n-1\n", image.width, image.height)
        .map_err(|e| Error::io(path, e))?;

    // The raster is grouped by row, rows ordered bottom to top.
    for row in image.rows().collect::<Vec<_>>().into_iter().rev() {
        for &f in row {
            writer
                .write_f32::<LittleEndian>(f)
                .map_err(|e| Error::io(path, e))?;
        }
    }

    writer.flush().map_err(|e| Error::io(path, e))
}

/// Magic bytes at the start of an NPY file.
const NPY_MAGIC: &[u8; 6] = b"\x93NUMPY";

/// Returns the regular expression matching a 2-D `<f4` NPY header.
fn regex_npy_header() -> &'static Regex {
    static DATA: OnceLock<Regex> = OnceLock::new();
    DATA.get_or_init(|| {
        Regex::new(
            r"'descr':\s*'<f4',\s*'fortran_order':\s*False,\s*'shape':\s*\((\d+),\s*(\d+),?\s*\)",
        )
        .expect("valid NPY header regex")
    })
}

/// Read a 2-D little endian `float32` NPY array.
///
/// * `path` - Input file path.
fn read_npy(path: &Path) -> Result<FloatImage> {
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    let file_size = file.metadata().map_err(|e| Error::io(path, e))?.len();
    let mut reader = BufReader::new(file);

    let mut magic = [0_u8; 6];
    reader
        .read_exact(&mut magic)
        .map_err(|e| Error::io(path, e))?;
    if &magic != NPY_MAGIC {
        return Err(Error::image(path, "not an NPY file"));
    }

    let major = reader.read_u8().map_err(|e| Error::io(path, e))?;
    let _minor = reader.read_u8().map_err(|e| Error::io(path, e))?;
    let header_len = match major {
        1 => reader.read_u16::<LittleEndian>().map(u64::from),
        _ => reader.read_u32::<LittleEndian>().map(u64::from),
    }
    .map_err(|e| Error::io(path, e))?;
    if header_len > file_size {
        return Err(Error::image(path, "NPY header longer than the file"));
    }
    let header_len = header_len as usize;

    let mut header = vec![0_u8; header_len];
    reader
        .read_exact(&mut header)
        .map_err(|e| Error::io(path, e))?;
    let header = String::from_utf8_lossy(&header);

    let caps = regex_npy_header()
        .captures(&header)
        .ok_or_else(|| Error::image(path, format!("unsupported NPY header {header}")))?;
    let dim = |i: usize| {
        caps[i]
            .parse::<usize>()
            .map_err(|e| Error::image(path, format!("NPY shape: {e}")))
    };
    let height = dim(1)?;
    let width = dim(2)?;

    let mut pixels = vec![0.0; raster_len(path, width, height, 1, file_size)?];
    reader
        .read_f32_into::<LittleEndian>(&mut pixels)
        .map_err(|e| Error::io(path, e))?;

    info!("Read NPY array {} ({height} x {width})", path.display());
    FloatImage::new(pixels, width, height)
}

/// Writes the image as a 2-D little endian `float32` NPY array of shape
/// (height, width).
///
/// * `path`  - Output file path.
/// * `image` - The image.
fn write_npy(path: &Path, image: &FloatImage) -> Result<()> {
    info!(
        "Writing array {} with shape ({}, {})",
        path.display(),
        image.height,
        image.width
    );

    let mut header = format!(
        "{{'descr': '<f4', 'fortran_order': False, 'shape': ({}, {}), }}",
        image.height, image.width
    );
    // Magic, version and length field take 10 bytes; the whole preamble is
    // padded with spaces to a multiple of 64 and terminated by a newline.
    let unpadded = NPY_MAGIC.len() + 4 + header.len() + 1;
    header.push_str(&" ".repeat((64 - unpadded % 64) % 64));
    header.push('\n');

    let file = File::create(path).map_err(|e| Error::io(path, e))?;
    let mut writer = BufWriter::new(file);

    let io = |e| Error::io(path, e);
    writer.write_all(NPY_MAGIC).map_err(io)?;
    writer.write_all(&[1, 0]).map_err(io)?;
    writer
        .write_u16::<LittleEndian>(header.len() as u16)
        .map_err(io)?;
    writer.write_all(header.as_bytes()).map_err(io)?;
    for &f in &image.pixels {
        writer.write_f32::<LittleEndian>(f).map_err(io)?;
    }
    writer.flush().map_err(io)
}

/// Writes an 8-bit grayscale preview with values normalized to the finite
/// range of the image. Non-finite pixels are black.
///
/// * `path`  - Output file path.
/// * `image` - The image.
fn write_png(path: &Path, image: &FloatImage) -> Result<()> {
    info!(
        "Writing image {} with resolution {}x{}",
        path.display(),
        image.width,
        image.height
    );

    let (lo, hi) = image
        .pixels
        .iter()
        .filter(|v| v.is_finite())
        .fold((INFINITY, -INFINITY), |(lo, hi), &v| (min(lo, v), max(hi, v)));
    let span = if hi > lo { hi - lo } else { 1.0 };

    let imgbuf = ImageBuffer::from_fn(image.width as u32, image.height as u32, |x, y| {
        let v = image.get(x as usize, y as usize);
        if v.is_finite() {
            Luma([clamp(255.0 * (v - lo) / span + 0.5, 0.0, 255.0) as u8])
        } else {
            Luma([0_u8])
        }
    });

    imgbuf
        .save_with_format(path, ImageFormat::Png)
        .map_err(|e| Error::image(path, e))
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

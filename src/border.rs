//! Edge padding around the synthesis step, so that kernels at the image border see a full
//! neighbourhood.

use crate::error::HalftoneError;
use crate::raster::Raster;

/// Pads `image` by `border` pixels on every side, replicating the nearest edge pixel.
///
/// An empty image has no edge to replicate and is returned unchanged.
pub fn expand(image: &Raster, border: u32) -> Raster {
    let (width, height) = (image.width(), image.height());
    if width == 0 || height == 0 {
        return image.clone();
    }
    let (new_width, new_height) = (width + 2 * border, height + 2 * border);
    let mut data = Vec::with_capacity(new_width as usize * new_height as usize * 4);
    for y in 0..new_height {
        let src = image.row(y.saturating_sub(border).min(height - 1));
        for x in 0..new_width {
            let sx = x.saturating_sub(border).min(width - 1) as usize * 4;
            data.extend_from_slice(&src[sx..sx + 4]);
        }
    }
    Raster::from_raw(new_width, new_height, data)
}

/// Removes `border` pixels from every side of `image`.
pub fn crop(image: &Raster, border: u32) -> Result<Raster, HalftoneError> {
    let (width, height) = (image.width(), image.height());
    let too_large = || HalftoneError::CropTooLarge {
        border,
        width,
        height,
    };
    let new_width = width
        .checked_sub(2 * border)
        .filter(|&w| w > 0)
        .ok_or_else(too_large)?;
    let new_height = height
        .checked_sub(2 * border)
        .filter(|&h| h > 0)
        .ok_or_else(too_large)?;

    let mut data = Vec::with_capacity(new_width as usize * new_height as usize * 4);
    let (start, end) = (border as usize * 4, (border + new_width) as usize * 4);
    for y in border..border + new_height {
        data.extend_from_slice(&image.row(y)[start..end]);
    }
    Ok(Raster::from_raw(new_width, new_height, data))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::color::Rgba;
    use hex_literal::hex;

    fn two_by_two() -> Raster {
        let data = hex!("ff0000ff 00ff00ff 0000ffff 10203040");
        Raster::from_rgba(2, 2, data.to_vec()).unwrap()
    }

    #[test]
    fn test_expand_replicates_edges() {
        let big = expand(&two_by_two(), 2);
        assert_eq!((big.width(), big.height()), (6, 6));
        let red = Rgba::opaque(255, 0, 0);
        let green = Rgba::opaque(0, 255, 0);
        let blue = Rgba::opaque(0, 0, 255);
        let odd = Rgba::new(0x10, 0x20, 0x30, 0x40);
        assert_eq!(
            big.row(0),
            hex!("ff0000ff ff0000ff ff0000ff 00ff00ff 00ff00ff 00ff00ff")
        );
        for (x, y, want) in [(0, 0, red), (2, 2, red), (5, 0, green), (0, 5, blue), (5, 5, odd), (3, 3, odd)] {
            assert_eq!(big.pixel(x, y), want, "({}, {})", x, y);
        }
    }

    #[test]
    fn test_expand_empty_image() {
        for (width, height) in [(0, 5), (5, 0), (0, 0)] {
            let out = expand(&Raster::filled(width, height, Rgba::BLACK), 15);
            assert_eq!((out.width(), out.height()), (width, height));
        }
    }

    #[test]
    fn test_round_trip() {
        let image = two_by_two();
        for border in [0, 1, 7] {
            assert_eq!(crop(&expand(&image, border), border).unwrap(), image);
        }
    }

    #[test]
    fn test_crop_too_large() {
        let image = Raster::filled(10, 6, Rgba::BLACK);
        assert_eq!(
            crop(&image, 3),
            Err(HalftoneError::CropTooLarge {
                border: 3,
                width: 10,
                height: 6
            })
        );
        assert_eq!(crop(&image, 2).unwrap().height(), 2);
    }
}

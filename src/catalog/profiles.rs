//! Built-in class tables
//!
//! Index order MUST match the output order of the model each table was exported with.

/// PlantVillage identifiers ("Plant___Condition"), sorted the way the training
/// directories were enumerated.
pub const PLANTVILLAGE_CLASSES: [&str; 38] = [
    "Apple___Apple_scab",                                 // 0
    "Apple___Black_rot",                                  // 1
    "Apple___Cedar_apple_rust",                           // 2
    "Apple___healthy",                                    // 3
    "Blueberry___healthy",                                // 4
    "Cherry_(including_sour)___Powdery_mildew",           // 5
    "Cherry_(including_sour)___healthy",                  // 6
    "Corn_(maize)___Cercospora_leaf_spot Gray_leaf_spot", // 7
    "Corn_(maize)___Common_rust_",                        // 8
    "Corn_(maize)___Northern_Leaf_Blight",                // 9
    "Corn_(maize)___healthy",                             // 10
    "Grape___Black_rot",                                  // 11
    "Grape___Esca_(Black_Measles)",                       // 12
    "Grape___Leaf_blight_(Isariopsis_Leaf_Spot)",         // 13
    "Grape___healthy",                                    // 14
    "Orange___Haunglongbing_(Citrus_greening)",           // 15
    "Peach___Bacterial_spot",                             // 16
    "Peach___healthy",                                    // 17
    "Pepper,_bell___Bacterial_spot",                      // 18
    "Pepper,_bell___healthy",                             // 19
    "Potato___Early_blight",                              // 20
    "Potato___Late_blight",                               // 21
    "Potato___healthy",                                   // 22
    "Raspberry___healthy",                                // 23
    "Soybean___healthy",                                  // 24
    "Squash___Powdery_mildew",                            // 25
    "Strawberry___Leaf_scorch",                           // 26
    "Strawberry___healthy",                               // 27
    "Tomato___Bacterial_spot",                            // 28
    "Tomato___Early_blight",                              // 29
    "Tomato___Late_blight",                               // 30
    "Tomato___Leaf_Mold",                                 // 31
    "Tomato___Septoria_leaf_spot",                        // 32
    "Tomato___Spider_mites Two-spotted_spider_mite",      // 33
    "Tomato___Target_Spot",                               // 34
    "Tomato___Tomato_Yellow_Leaf_Curl_Virus",             // 35
    "Tomato___Tomato_mosaic_virus",                       // 36
    "Tomato___healthy",                                   // 37
];

/// Number of training images per PlantVillage class, same order as [`PLANTVILLAGE_CLASSES`].
pub const PLANTVILLAGE_COUNTS: [u64; 38] = [
    630, 621, 275, 1645, 1502, 1052, 854, 513, 1192, 985, 1162, 1180, 1383, 1076, 423, 5507,
    2297, 360, 997, 1478, 1000, 1000, 152, 371, 5090, 1835, 1109, 456, 2127, 1000, 1909, 952,
    1771, 1676, 1404, 5357, 373, 1591,
];

/// Short identifiers ("Plant_condition") of the condensed model.
///
/// Not a renaming of [`PLANTVILLAGE_CLASSES`]: the order differs (potato and
/// tomato entries), so the two tables belong to different exports.
pub const CONDENSED_CLASSES: [&str; 38] = [
    "Apple_scab",
    "Apple_black_rot",
    "Apple_cedar_apple_rust",
    "Apple_healthy",
    "Blueberry_healthy",
    "Cherry_powdery_mildew",
    "Cherry_healthy",
    "Corn_gray_leaf_spot",
    "Corn_common_rust",
    "Corn_northern_leaf_blight",
    "Corn_healthy",
    "Grape_black_rot",
    "Grape_black_measles",
    "Grape_leaf_blight",
    "Grape_healthy",
    "Orange_haunglongbing",
    "Peach_bacterial_spot",
    "Peach_healthy",
    "Pepper_bacterial_spot",
    "Pepper_healthy",
    "Potato_early_blight",
    "Potato_healthy",
    "Potato_late_blight",
    "Raspberry_healthy",
    "Soybean_healthy",
    "Squash_powdery_mildew",
    "Strawberry_healthy",
    "Strawberry_leaf_scorch",
    "Tomato_bacterial_spot",
    "Tomato_early_blight",
    "Tomato_healthy",
    "Tomato_late_blight",
    "Tomato_leaf_mold",
    "Tomato_septoria_leaf_spot",
    "Tomato_spider_mites_two-spotted_spider_mite",
    "Tomato_target_spot",
    "Tomato_mosaic_virus",
    "Tomato_yellow_leaf_curl_virus",
];
